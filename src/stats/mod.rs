//! Chat statistics engine.
//!
//! Runs a transcript through a one-way pipeline:
//!
//! 1. [`Transcript`] parses raw text into message records (lazily)
//! 2. [`Classifier`] annotates each record (media, link, apology, emoji)
//! 3. [`Aggregator`] folds annotated records into per-sender tallies
//! 4. [`Report::build`] picks the two participants and finalizes ratios
//!
//! Every call to [`analyze`] builds its own classifier and aggregator, so
//! concurrent analyses never share mutable state.
//!
//! # Module Structure
//!
//! - [`classify`] - Pure predicates and the per-record classifier
//! - [`aggregate`] - Single-pass per-sender accumulation
//! - [`report`] - Participant totals, monthly matrix and text tables

pub mod aggregate;
pub mod classify;
mod error;
pub mod report;

pub use aggregate::{Aggregation, Aggregator, ExcludedSender, SenderTally};
pub use classify::{Annotation, Classifier};
pub use error::AnalysisError;
pub use report::{ChartSeries, MonthlyMatrix, ParticipantTotals, Report};

use tracing::info;

use crate::transcript::{DateOrder, ParseError, ParseStats, Transcript};

/// Settings for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Order of month and day in header dates
    pub date_order: DateOrder,
    /// Words counted as apologies (whole word, any case)
    pub apology_words: Vec<String>,
    /// Attachment placeholders on top of the built-in list
    pub media_placeholders: Vec<String>,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            date_order: DateOrder::default(),
            apology_words: classify::DEFAULT_APOLOGY_WORDS
                .iter()
                .map(|w| w.to_string())
                .collect(),
            media_placeholders: Vec::new(),
        }
    }
}

impl AnalyzeOptions {
    /// Set the header date order.
    pub fn date_order(mut self, order: DateOrder) -> Self {
        self.date_order = order;
        self
    }

    /// Replace the apology word list.
    pub fn apology_words(mut self, words: Vec<String>) -> Self {
        self.apology_words = words;
        self
    }

    /// Replace the extra media placeholder list.
    pub fn media_placeholders(mut self, placeholders: Vec<String>) -> Self {
        self.media_placeholders = placeholders;
        self
    }
}

/// Everything an analysis run produced.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// The report for the presentation layer.
    pub report: Report,
    /// Senders dropped because the transcript had more than two.
    pub excluded_senders: Vec<ExcludedSender>,
    /// Deleted-message tombstones that were ignored.
    pub deleted_messages: usize,
    /// How the parser consumed the text.
    pub parse_stats: ParseStats,
}

/// Analyze a transcript.
///
/// # Errors
///
/// - [`AnalysisError::Parse`] if the text is empty, has no message lines,
///   or only contains deleted messages
/// - [`AnalysisError::InvalidPattern`] if the apology words are invalid
pub fn analyze(text: &str, options: &AnalyzeOptions) -> Result<Analysis, AnalysisError> {
    let classifier = Classifier::new(&options.apology_words, &options.media_placeholders)?;
    let transcript = Transcript::parse_with(text, options.date_order)?;

    let mut aggregator = Aggregator::new();
    let mut records = transcript.records();
    for record in records.by_ref() {
        let annotation = classifier.classify(&record);
        aggregator.add(&record, &annotation);
    }
    let parse_stats = records.stats();

    let aggregation = aggregator.finish();
    if aggregation.participants.is_empty() {
        return Err(ParseError::NoMessages {
            lines: parse_stats.lines,
        }
        .into());
    }

    let report = Report::build(&aggregation);
    info!(
        records = parse_stats.records,
        skipped_lines = parse_stats.skipped(),
        person1 = %report.person1.name,
        person2 = %report.person2.name,
        "transcript analyzed"
    );

    Ok(Analysis {
        report,
        excluded_senders: aggregation.excluded,
        deleted_messages: aggregation.deleted_messages,
        parse_stats,
    })
}
