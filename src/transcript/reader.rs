//! Chat transcript line parser.
//!
//! Turns exported chat text into a lazy sequence of [`MessageRecord`]s.
//! Two header layouts are recognized, both anchored at the start of a line:
//!
//! ```text
//! [1/31/24, 9:05:12 PM] Alice: hello       <- bracketed (seconds optional)
//! 1/31/24, 21:05 - Alice: hello            <- dashed (AM/PM optional)
//! ```
//!
//! With an AM/PM suffix the hour is read on a 12-hour clock, otherwise as a
//! 24-hour value. Two-digit years are taken as 20YY.
//!
//! # Line handling
//!
//! - Header with `Sender: text` starts a new record
//! - Header without a sender is a system notice; it is dropped and ends the
//!   current record
//! - Header with an impossible date or time is dropped and ends the current record
//! - Any other line continues the current record's body
//! - Lines with control characters, and continuation lines with no record
//!   to attach to, are skipped
//!
//! # Example
//!
//! ```
//! use chatstats::transcript::Transcript;
//!
//! let text = "[1/1/24, 10:00:00 AM] Alice: hi\n[1/1/24, 10:05:00 AM] Bob: hi sorry";
//! let transcript = Transcript::parse(text)?;
//! let senders: Vec<String> = transcript.records().map(|r| r.sender).collect();
//! assert_eq!(senders, ["Alice", "Bob"]);
//! # Ok::<(), chatstats::transcript::ParseError>(())
//! ```

use std::borrow::Cow;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::{Captures, Regex};
use tracing::debug;

use super::error::ParseError;
use super::types::{DateOrder, MessageRecord, ParseStats};

/// Marker the exporter appends to edited messages.
pub const EDITED_MARKER: &str = "<This message was edited>";

static BRACKETED_HEADER: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // [1/31/24, 9:05:12 PM] rest
    Regex::new(
        r"^\[(\d{1,2})/(\d{1,2})/(\d{4}|\d{2}),\s*(\d{1,2}):(\d{2})(?::(\d{2}))?(?:\s*([AaPp][Mm]))?\]\s*(.*)$",
    )
    .ok()
});

static DASHED_HEADER: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // 1/31/24, 21:05 - rest
    Regex::new(
        r"^(\d{1,2})/(\d{1,2})/(\d{4}|\d{2}),\s*(\d{1,2}):(\d{2})(?::(\d{2}))?(?:\s*([AaPp][Mm]))?\s+-\s+(.*)$",
    )
    .ok()
});

// ============================================================================
// Transcript
// ============================================================================

/// A validated transcript, ready to be iterated.
///
/// Holds a borrow of the raw text only. Each call to [`records`](Self::records)
/// starts a fresh pass, so the same transcript can be analyzed repeatedly.
#[derive(Debug, Clone, Copy)]
pub struct Transcript<'a> {
    text: &'a str,
    date_order: DateOrder,
}

impl<'a> Transcript<'a> {
    /// Validate `text` using the default month-first date order.
    ///
    /// # Errors
    ///
    /// See [`parse_with`](Self::parse_with).
    pub fn parse(text: &'a str) -> Result<Self, ParseError> {
        Self::parse_with(text, DateOrder::default())
    }

    /// Validate `text` with an explicit date order.
    ///
    /// # Errors
    ///
    /// - [`ParseError::Empty`] if the text is empty or whitespace
    /// - [`ParseError::NoMessages`] if no line yields a message record
    pub fn parse_with(text: &'a str, date_order: DateOrder) -> Result<Self, ParseError> {
        if text.trim().is_empty() {
            return Err(ParseError::Empty);
        }

        let transcript = Self { text, date_order };

        // Stops at the first record, so this only scans the leading lines
        let mut probe = transcript.records();
        if probe.next().is_none() {
            return Err(ParseError::NoMessages {
                lines: probe.stats().lines,
            });
        }

        Ok(transcript)
    }

    /// Iterate over the message records from the start of the text.
    pub fn records(&self) -> Records<'a> {
        Records {
            lines: self.text.lines(),
            date_order: self.date_order,
            pending: None,
            stats: ParseStats::default(),
        }
    }

    /// Date order the transcript is parsed with.
    pub fn date_order(&self) -> DateOrder {
        self.date_order
    }
}

/// Decode uploaded bytes as UTF-8, dropping invalid sequences.
pub fn decode(bytes: &[u8]) -> Cow<'_, str> {
    match String::from_utf8_lossy(bytes) {
        Cow::Borrowed(text) => Cow::Borrowed(text),
        Cow::Owned(text) => Cow::Owned(text.replace(char::REPLACEMENT_CHARACTER, "")),
    }
}

// ============================================================================
// Record Iterator
// ============================================================================

/// Lazy iterator over the records of a [`Transcript`].
///
/// A record is only emitted once the next header (or the end of the text)
/// shows that no further continuation lines belong to it.
#[derive(Debug)]
pub struct Records<'a> {
    lines: std::str::Lines<'a>,
    date_order: DateOrder,
    pending: Option<PendingRecord>,
    stats: ParseStats,
}

#[derive(Debug)]
struct PendingRecord {
    timestamp: NaiveDateTime,
    sender: String,
    body: String,
}

impl Records<'_> {
    /// Line counters accumulated so far.
    pub fn stats(&self) -> ParseStats {
        self.stats
    }

    fn finalize(pending: PendingRecord, stats: &mut ParseStats) -> MessageRecord {
        stats.records += 1;

        let mut body = pending.body.replace('\u{200e}', "");
        let edited = body.contains(EDITED_MARKER);
        if edited {
            body = body.replace(EDITED_MARKER, "");
        }

        MessageRecord {
            timestamp: pending.timestamp,
            sender: pending.sender,
            body: body.trim().to_string(),
            edited,
        }
    }
}

impl Iterator for Records<'_> {
    type Item = MessageRecord;

    fn next(&mut self) -> Option<MessageRecord> {
        for raw in self.lines.by_ref() {
            self.stats.lines += 1;
            let line = normalize(raw);

            let Some(header) = match_header(&line, self.date_order) else {
                if is_garbage(&line) {
                    self.stats.garbage_lines += 1;
                    debug!(line = self.stats.lines, "skipping line with control characters");
                    continue;
                }
                match self.pending.as_mut() {
                    Some(pending) => {
                        pending.body.push('\n');
                        pending.body.push_str(&line);
                    }
                    None if !line.is_empty() => {
                        self.stats.orphan_lines += 1;
                        debug!(line = self.stats.lines, "skipping line outside any message");
                    }
                    None => {}
                }
                continue;
            };

            // Any header ends the record in progress
            let finished = self.pending.take();

            match header.timestamp {
                None => {
                    self.stats.invalid_timestamps += 1;
                    debug!(line = self.stats.lines, "skipping header with invalid timestamp");
                }
                Some(timestamp) => match split_sender(header.rest) {
                    Some((sender, body)) => {
                        self.pending = Some(PendingRecord {
                            timestamp,
                            sender: sender.to_string(),
                            body: body.to_string(),
                        });
                    }
                    None => {
                        self.stats.system_lines += 1;
                        debug!(line = self.stats.lines, "dropping system notice");
                    }
                },
            }

            if let Some(done) = finished {
                return Some(Self::finalize(done, &mut self.stats));
            }
        }

        let last = self.pending.take()?;
        Some(Self::finalize(last, &mut self.stats))
    }
}

// ============================================================================
// Line Helpers
// ============================================================================

/// Header fields of a line that matched one of the timestamp layouts.
#[derive(Debug)]
struct Header<'l> {
    /// `None` when the digits do not form a real date or time.
    timestamp: Option<NaiveDateTime>,
    /// Everything after the timestamp prefix.
    rest: &'l str,
}

/// Replace exporter-specific spaces and strip direction/BOM marks.
fn normalize(raw: &str) -> Cow<'_, str> {
    const SPECIAL_SPACES: [char; 2] = ['\u{202f}', '\u{00a0}'];

    let line = raw
        .trim_start_matches(['\u{feff}', '\u{200e}'])
        .trim_end();
    if line.contains(SPECIAL_SPACES) {
        Cow::Owned(line.replace(SPECIAL_SPACES, " "))
    } else {
        Cow::Borrowed(line)
    }
}

fn match_header(line: &str, date_order: DateOrder) -> Option<Header<'_>> {
    let captures = [&*BRACKETED_HEADER, &*DASHED_HEADER]
        .into_iter()
        .flatten()
        .find_map(|re| re.captures(line))?;

    let rest = captures.get(8).map_or("", |m| m.as_str());
    Some(Header {
        timestamp: build_timestamp(&captures, date_order),
        rest,
    })
}

fn build_timestamp(captures: &Captures<'_>, date_order: DateOrder) -> Option<NaiveDateTime> {
    let number = |index: usize| -> Option<u32> { captures.get(index)?.as_str().parse().ok() };

    let (first, second) = (number(1)?, number(2)?);
    let (month, day) = match date_order {
        DateOrder::MonthFirst => (first, second),
        DateOrder::DayFirst => (second, first),
    };

    let year_text = captures.get(3)?.as_str();
    let year: i32 = year_text.parse().ok()?;
    let year = if year_text.len() == 2 { 2000 + year } else { year };

    let mut hour = number(4)?;
    let minute = number(5)?;
    let seconds = match captures.get(6) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };

    if let Some(meridiem) = captures.get(7) {
        if !(1..=12).contains(&hour) {
            return None;
        }
        let pm = meridiem.as_str().eq_ignore_ascii_case("pm");
        hour = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, false) => h,
            (h, true) => h + 12,
        };
    }

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::from_hms_opt(hour, minute, seconds)?;
    Some(date.and_time(time))
}

/// Split `Sender: text`. Returns `None` for system notices.
fn split_sender(rest: &str) -> Option<(&str, &str)> {
    let (sender, body) = match rest.split_once(": ") {
        Some(parts) => parts,
        None => (rest.strip_suffix(':')?, ""),
    };
    let sender = sender.trim();
    if sender.is_empty() {
        return None;
    }
    Some((sender, body))
}

fn is_garbage(line: &str) -> bool {
    line.chars().any(|c| c.is_control() && c != '\t')
}
