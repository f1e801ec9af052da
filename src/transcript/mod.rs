//! Exported chat transcript parsing.
//!
//! - [`types`] - Message records and parser counters
//! - [`reader`] - Header matching, continuation handling and the lazy record iterator
//! - [`error`] - Whole-transcript failures

mod error;
mod reader;
mod types;

pub use error::ParseError;
pub use reader::{decode, Records, Transcript, EDITED_MARKER};
pub use types::{DateOrder, MessageRecord, ParseStats};
