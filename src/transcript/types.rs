//! Type definitions for parsed chat transcripts.
//!
//! A transcript is the plain-text export of a chat. Every message starts on a
//! header line carrying a timestamp and the sender name. Message bodies that
//! span several physical lines continue on lines without a header.
//!
//! # Example
//!
//! ```text
//! [1/31/24, 9:05:12 PM] Alice: see you
//! tomorrow then
//! 1/31/24, 21:06 - Bob: ok
//! ```

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ============================================================================
// Records
// ============================================================================

/// One logical chat message.
///
/// Built from a header line plus any continuation lines that follow it.
/// Records are never modified after the parser hands them out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageRecord {
    /// Timestamp from the header line (local time of the exporting device).
    pub timestamp: NaiveDateTime,

    /// Sender name exactly as exported, trimmed.
    pub sender: String,

    /// Message text. Continuation lines are joined with `\n`, surrounding
    /// whitespace is trimmed.
    pub body: String,

    /// The export flagged this message as edited. The marker itself is
    /// removed from `body`.
    pub edited: bool,
}

impl MessageRecord {
    /// Calendar day the message was sent on.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

// ============================================================================
// Parser Settings
// ============================================================================

/// Order of the first two numeric fields of a header date.
///
/// US exports write `M/D/YY`, most other locales write `D/M/YY`. The two
/// cannot be told apart reliably from the text alone, so the order is a
/// setting rather than a guess.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateOrder {
    /// `M/D/YY` (default)
    #[default]
    MonthFirst,
    /// `D/M/YY`
    DayFirst,
}

// ============================================================================
// Statistics
// ============================================================================

/// Counters describing how the parser consumed a transcript.
///
/// Only meaningful once the record iterator has been drained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    /// Physical lines read.
    pub lines: usize,
    /// Message records produced.
    pub records: usize,
    /// Header lines without a sender (encryption notices, group events).
    pub system_lines: usize,
    /// Header lines whose date or time does not exist.
    pub invalid_timestamps: usize,
    /// Non-header lines seen before any message started.
    pub orphan_lines: usize,
    /// Lines containing control characters.
    pub garbage_lines: usize,
}

impl ParseStats {
    /// Number of non-empty lines that did not contribute to any record.
    pub fn skipped(&self) -> usize {
        self.system_lines + self.invalid_timestamps + self.orphan_lines + self.garbage_lines
    }
}
