//! chatstats Library
//!
//! Parses exported two-person chat transcripts and computes per-participant
//! conversation statistics, with an optional HTTP upload endpoint.

pub mod config;
pub mod server;
pub mod stats;
pub mod transcript;

pub use config::Config;
pub use stats::{analyze, Analysis, AnalysisError, AnalyzeOptions, ParticipantTotals, Report};
pub use transcript::{DateOrder, MessageRecord, ParseError, Transcript};
