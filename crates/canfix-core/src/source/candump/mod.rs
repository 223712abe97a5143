//! candump log source.
//!
//! Reads the text format written by `candump -l` (and the bare `ID#DATA`
//! form accepted by `cansend`), emitting classic 11-bit frames for the
//! analysis pipeline. Extended, remote and CAN FD frames are skipped.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::{CandumpFileSource, CandumpSource};
pub use reader::parse_frame_text;
