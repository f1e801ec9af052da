//! Single-pass accumulation of per-sender totals.
//!
//! The aggregator keeps a tally for every sender it sees, because the two
//! participants can only be chosen once the whole transcript has been read.
//! [`Aggregator::finish`] then keeps the two most active senders and reports
//! the rest as excluded.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::warn;

use super::classify::Annotation;
use crate::transcript::MessageRecord;

/// Calendar month key: `(year, month 1..=12)`.
pub type YearMonth = (i32, u32);

/// Running totals for one sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderTally {
    pub name: String,
    /// Position of the sender's first message among all senders (0-based).
    pub first_seen: usize,
    pub messages: u64,
    pub characters: u64,
    pub sorry_count: u64,
    pub media_count: u64,
    pub link_count: u64,
    pub emoji_count: u64,
    pub active_days: BTreeSet<NaiveDate>,
    /// Messages per month. Only months with at least one message.
    pub monthly: BTreeMap<YearMonth, u64>,
}

impl SenderTally {
    fn new(name: &str, first_seen: usize) -> Self {
        Self {
            name: name.to_string(),
            first_seen,
            messages: 0,
            characters: 0,
            sorry_count: 0,
            media_count: 0,
            link_count: 0,
            emoji_count: 0,
            active_days: BTreeSet::new(),
            monthly: BTreeMap::new(),
        }
    }

    /// Earliest day with a message.
    pub fn first_day(&self) -> Option<NaiveDate> {
        self.active_days.first().copied()
    }

    /// Latest day with a message.
    pub fn last_day(&self) -> Option<NaiveDate> {
        self.active_days.last().copied()
    }
}

/// A sender dropped because two others sent more messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExcludedSender {
    pub name: String,
    pub messages: u64,
}

/// Result of a finished aggregation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    /// At most two tallies, in order of first appearance.
    pub participants: Vec<SenderTally>,
    /// Senders beyond the two most active, most active first.
    pub excluded: Vec<ExcludedSender>,
    /// Deleted-message tombstones that were ignored.
    pub deleted_messages: usize,
}

/// Folds annotated records into per-sender tallies.
///
/// Create one per analysis; it is consumed by [`finish`](Self::finish).
#[derive(Debug, Default)]
pub struct Aggregator {
    senders: Vec<SenderTally>,
    index: HashMap<String, usize>,
    deleted_messages: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one record.
    ///
    /// Deleted-message tombstones are ignored. Media placeholders count as
    /// messages but add no characters.
    pub fn add(&mut self, record: &MessageRecord, annotation: &Annotation) {
        if annotation.is_deleted {
            self.deleted_messages += 1;
            return;
        }

        let slot = match self.index.get(&record.sender) {
            Some(&slot) => slot,
            None => {
                let slot = self.senders.len();
                self.senders.push(SenderTally::new(&record.sender, slot));
                self.index.insert(record.sender.clone(), slot);
                slot
            }
        };
        let tally = &mut self.senders[slot];

        tally.messages += 1;
        if annotation.is_media {
            tally.media_count += 1;
        } else {
            tally.characters += record.body.chars().count() as u64;
        }
        if annotation.is_sorry {
            tally.sorry_count += 1;
        }
        if annotation.is_link {
            tally.link_count += 1;
        }
        tally.emoji_count += annotation.emoji_count as u64;

        let date = record.date();
        tally.active_days.insert(date);
        *tally
            .monthly
            .entry((date.year(), date.month()))
            .or_insert(0) += 1;
    }

    /// Pick the two most active senders and close the pass.
    ///
    /// Ties on message count go to the sender who appeared first.
    pub fn finish(self) -> Aggregation {
        let mut ranked = self.senders;
        ranked.sort_by(|a, b| {
            b.messages
                .cmp(&a.messages)
                .then(a.first_seen.cmp(&b.first_seen))
        });

        let dropped = ranked.split_off(ranked.len().min(2));
        ranked.sort_by_key(|tally| tally.first_seen);

        let excluded: Vec<ExcludedSender> = dropped
            .into_iter()
            .map(|tally| ExcludedSender {
                name: tally.name,
                messages: tally.messages,
            })
            .collect();

        if !excluded.is_empty() {
            let kept: Vec<&str> = ranked.iter().map(|t| t.name.as_str()).collect();
            warn!(
                ?kept,
                ?excluded,
                "transcript has more than two senders, keeping the two most active"
            );
        }

        Aggregation {
            participants: ranked,
            excluded,
            deleted_messages: self.deleted_messages,
        }
    }
}
