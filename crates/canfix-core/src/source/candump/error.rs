use thiserror::Error;

use crate::frame::FrameError;

/// Problems with a single candump line.
///
/// # Examples
/// ```
/// use canfix_core::source::candump::error::LineError;
///
/// let err = LineError::MissingSeparator;
/// assert!(err.to_string().contains("'#'"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),
    #[error("missing '#' between identifier and data")]
    MissingSeparator,
    #[error("invalid identifier '{0}'")]
    InvalidId(String),
    #[error("invalid data '{0}'")]
    InvalidData(String),
    #[error("unsupported frame: {0}")]
    Unsupported(&'static str),
    #[error(transparent)]
    Frame(#[from] FrameError),
}

#[derive(Debug, Error)]
pub enum CandumpSourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("candump parse error (line {line}): {source}")]
    Line { line: usize, source: LineError },
}
