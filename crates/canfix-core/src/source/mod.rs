pub mod candump;

pub use candump::{CandumpFileSource, CandumpSource, parse_frame_text};

use thiserror::Error;

use crate::frame::CanFrame;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameEvent {
    /// Capture time in microseconds since the Unix epoch, when logged.
    pub ts_micros: Option<i64>,
    pub interface: Option<String>,
    pub frame: CanFrame,
}

pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<FrameEvent>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("candump parse error at line {line}: {message}")]
    Candump { line: usize, message: String },
}

impl From<candump::error::CandumpSourceError> for SourceError {
    fn from(value: candump::error::CandumpSourceError) -> Self {
        match value {
            candump::error::CandumpSourceError::Io(err) => SourceError::Io(err),
            candump::error::CandumpSourceError::Line { line, source } => SourceError::Candump {
                line,
                message: source.to_string(),
            },
        }
    }
}
