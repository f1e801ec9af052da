//! Transcript parse errors.

/// The transcript as a whole cannot be analyzed.
///
/// Problems with individual lines never produce this error; they are
/// skipped and counted in [`ParseStats`](super::ParseStats) instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Transcript is empty")]
    Empty,

    #[error(
        "No chat messages found in {lines} line(s). Expected lines like \
         '[1/31/24, 9:05:12 PM] Name: text' or '1/31/24, 21:05 - Name: text'"
    )]
    NoMessages { lines: usize },
}
