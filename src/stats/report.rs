//! Final report assembly.
//!
//! Converts the two kept [`SenderTally`]s into [`ParticipantTotals`] with
//! finalized ratios, and builds the sparse [`MonthlyMatrix`] keyed by
//! participant name. The JSON produced from [`Report`] is the contract with
//! the presentation layer:
//!
//! ```text
//! {
//!   "person1": { "name": "Alice", "messages": 1, ... },
//!   "person2": { "name": "Bob", "messages": 1, ... },
//!   "monthly": { "2024": { "1": { "Alice": 1, "Bob": 1 } } }
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::aggregate::{Aggregation, SenderTally};

/// Name used for the second participant when a transcript has one sender.
pub const UNKNOWN_PARTICIPANT: &str = "Unknown";

/// `year → month (1..=12) → participant name → messages`.
///
/// Sparse in years and months. Every present month lists both participants.
pub type MonthlyMatrix = BTreeMap<i32, BTreeMap<u32, BTreeMap<String, u64>>>;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Statistics for one participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantTotals {
    pub name: String,
    pub messages: u64,
    /// Characters in non-media messages.
    pub characters: u64,
    /// `characters / messages`, half-up to 2 decimals; 0.0 without messages.
    pub average_length: f64,
    pub sorry_count: u64,
    pub media_count: u64,
    pub link_count: u64,
    pub emoji_count: u64,
    /// Share of conversation days with a message, half-up to 1 decimal.
    pub active_days_percentage: f64,
    /// Change from the first to the last active month in percent, 1 decimal;
    /// 0.0 with fewer than two active months.
    pub monthly_growth: f64,
}

impl ParticipantTotals {
    /// Totals for a participant without any messages.
    pub fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            messages: 0,
            characters: 0,
            average_length: 0.0,
            sorry_count: 0,
            media_count: 0,
            link_count: 0,
            emoji_count: 0,
            active_days_percentage: 0.0,
            monthly_growth: 0.0,
        }
    }

    fn from_tally(tally: &SenderTally, span_days: i64) -> Self {
        Self {
            name: tally.name.clone(),
            messages: tally.messages,
            characters: tally.characters,
            average_length: rounded_ratio(tally.characters as i64, tally.messages as i64, 1, 2),
            sorry_count: tally.sorry_count,
            media_count: tally.media_count,
            link_count: tally.link_count,
            emoji_count: tally.emoji_count,
            active_days_percentage: rounded_ratio(
                tally.active_days.len() as i64,
                span_days,
                100,
                1,
            ),
            monthly_growth: monthly_growth(tally),
        }
    }
}

/// Per-participant 12-month series for one year, months without messages as 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSeries {
    pub year: i32,
    /// `(participant name, counts for January..=December)` in report order.
    pub series: Vec<(String, [u64; 12])>,
}

/// The analysis result handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// First participant to appear in the transcript.
    pub person1: ParticipantTotals,
    /// Second participant to appear (or the placeholder).
    pub person2: ParticipantTotals,
    pub monthly: MonthlyMatrix,
}

impl Report {
    /// Assemble the report from a finished aggregation.
    ///
    /// Uses the [`UNKNOWN_PARTICIPANT`] placeholder for any missing participant.
    pub fn build(aggregation: &Aggregation) -> Self {
        let tallies = &aggregation.participants;
        let span_days = conversation_span_days(tallies);

        let mut people = tallies
            .iter()
            .take(2)
            .map(|tally| ParticipantTotals::from_tally(tally, span_days));
        let person1 = people
            .next()
            .unwrap_or_else(|| ParticipantTotals::empty(UNKNOWN_PARTICIPANT));
        let person2 = people
            .next()
            .unwrap_or_else(|| ParticipantTotals::empty(&placeholder_name(&person1.name)));

        let names = [person1.name.as_str(), person2.name.as_str()];
        let monthly = monthly_matrix(tallies, &names);

        Self {
            person1,
            person2,
            monthly,
        }
    }

    /// Both participants in report order.
    pub fn participants(&self) -> [&ParticipantTotals; 2] {
        [&self.person1, &self.person2]
    }

    /// Messages sent by both participants.
    pub fn total_messages(&self) -> u64 {
        self.person1.messages + self.person2.messages
    }

    /// Years with at least one message, ascending.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.monthly.keys().copied()
    }

    /// Messages sent in `year` by both participants.
    pub fn year_total(&self, year: i32) -> u64 {
        self.monthly
            .get(&year)
            .map(|months| months.values().flat_map(|counts| counts.values()).sum())
            .unwrap_or(0)
    }

    /// Dense monthly series for a line chart, `None` if the year has no messages.
    pub fn chart_series(&self, year: i32) -> Option<ChartSeries> {
        let months = self.monthly.get(&year)?;
        let series = self
            .participants()
            .iter()
            .map(|person| {
                let mut counts = [0u64; 12];
                for (&month, per_person) in months {
                    let slot = (month as usize)
                        .checked_sub(1)
                        .and_then(|index| counts.get_mut(index));
                    if let Some(slot) = slot {
                        *slot = per_person.get(&person.name).copied().unwrap_or(0);
                    }
                }
                (person.name.clone(), counts)
            })
            .collect();
        Some(ChartSeries { year, series })
    }

    /// Plain-text statistics table for terminal output.
    pub fn summary_table(&self) -> String {
        let width = column_width(self);
        let [p1, p2] = self.participants();
        let mut out = String::new();

        let _ = writeln!(out, "{:<16}{:>w$}{:>w$}", "", p1.name, p2.name, w = width);
        let mut row = |label: &str, a: String, b: String| {
            let _ = writeln!(out, "{:<16}{:>w$}{:>w$}", label, a, b, w = width);
        };
        row("Messages", p1.messages.to_string(), p2.messages.to_string());
        row("Characters", p1.characters.to_string(), p2.characters.to_string());
        row(
            "Average length",
            format!("{:.2}", p1.average_length),
            format!("{:.2}", p2.average_length),
        );
        row("Sorry", p1.sorry_count.to_string(), p2.sorry_count.to_string());
        row("Media", p1.media_count.to_string(), p2.media_count.to_string());
        row("Links", p1.link_count.to_string(), p2.link_count.to_string());
        row("Emoji", p1.emoji_count.to_string(), p2.emoji_count.to_string());
        row(
            "Active days",
            format!("{:.1}%", p1.active_days_percentage),
            format!("{:.1}%", p2.active_days_percentage),
        );
        row(
            "Monthly growth",
            format!("{:.1}%", p1.monthly_growth),
            format!("{:.1}%", p2.monthly_growth),
        );

        out
    }

    /// Month-by-month table for each year in `years` that has messages.
    pub fn trend_table(&self, years: RangeInclusive<i32>) -> String {
        let width = column_width(self);
        let mut out = String::new();

        for year in years {
            let Some(chart) = self.chart_series(year) else {
                continue;
            };
            if !out.is_empty() {
                out.push('\n');
            }
            let _ = writeln!(out, "Monthly messages {}", year);
            let _ = write!(out, "{:<16}", "Month");
            for (name, _) in &chart.series {
                let _ = write!(out, "{:>w$}", name, w = width);
            }
            out.push('\n');
            for (index, month) in MONTH_NAMES.iter().enumerate() {
                let _ = write!(out, "{:<16}", month);
                for (_, counts) in &chart.series {
                    let _ = write!(out, "{:>w$}", counts[index], w = width);
                }
                out.push('\n');
            }
        }

        out
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// `numerator / denominator * factor`, rounded half away from zero to
/// `decimals` places. Returns 0.0 for a zero denominator.
pub fn rounded_ratio(numerator: i64, denominator: i64, factor: i64, decimals: u32) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    let scale = 10_i128.pow(decimals);
    let scaled = numerator as i128 * factor as i128 * scale;
    let den = denominator as i128;
    let magnitude = (2 * scaled.abs() + den.abs()) / (2 * den.abs());
    let signed = if (scaled < 0) != (den < 0) {
        -magnitude
    } else {
        magnitude
    };
    signed as f64 / scale as f64
}

/// Percentage change between the first and last active month.
fn monthly_growth(tally: &SenderTally) -> f64 {
    if tally.monthly.len() < 2 {
        return 0.0;
    }
    let first = tally.monthly.values().next().copied().unwrap_or(0) as i64;
    let last = tally.monthly.values().next_back().copied().unwrap_or(0) as i64;
    rounded_ratio(last - first, first, 100, 1)
}

/// Inclusive day count from the earliest to the latest message of the
/// given participants.
fn conversation_span_days(tallies: &[SenderTally]) -> i64 {
    let first = tallies.iter().filter_map(SenderTally::first_day).min();
    let last = tallies.iter().filter_map(SenderTally::last_day).max();
    match (first, last) {
        (Some(first), Some(last)) => (last - first).num_days() + 1,
        _ => 0,
    }
}

fn monthly_matrix(tallies: &[SenderTally], names: &[&str; 2]) -> MonthlyMatrix {
    let mut matrix = MonthlyMatrix::new();
    for tally in tallies.iter().take(2) {
        for (&(year, month), &count) in &tally.monthly {
            let per_person = matrix
                .entry(year)
                .or_default()
                .entry(month)
                .or_insert_with(|| names.iter().map(|n| (n.to_string(), 0)).collect());
            *per_person.entry(tally.name.clone()).or_insert(0) += count;
        }
    }
    matrix
}

fn placeholder_name(taken: &str) -> String {
    if taken == UNKNOWN_PARTICIPANT {
        format!("{} (2)", UNKNOWN_PARTICIPANT)
    } else {
        UNKNOWN_PARTICIPANT.to_string()
    }
}

fn column_width(report: &Report) -> usize {
    report
        .participants()
        .iter()
        .map(|p| p.name.chars().count() + 2)
        .max()
        .unwrap_or(0)
        .max(12)
}
