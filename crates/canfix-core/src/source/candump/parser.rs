use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use log::debug;

use crate::source::{FrameEvent, FrameSource, SourceError};

use super::error::CandumpSourceError;
use super::reader::{LineOutcome, parse_line};

/// Frame source over any buffered candump text.
pub struct CandumpSource<R> {
    lines: Lines<R>,
    line_no: usize,
}

pub type CandumpFileSource = CandumpSource<BufReader<File>>;

impl<R: BufRead> CandumpSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl CandumpFileSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path).map_err(SourceError::from)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> FrameSource for CandumpSource<R> {
    fn next_frame(&mut self) -> Result<Option<FrameEvent>, SourceError> {
        next_frame(self).map_err(SourceError::from)
    }
}

fn next_frame<R: BufRead>(
    source: &mut CandumpSource<R>,
) -> Result<Option<FrameEvent>, CandumpSourceError> {
    for line in source.lines.by_ref() {
        let line = line?;
        source.line_no += 1;
        match parse_line(&line) {
            Ok(LineOutcome::Frame(event)) => return Ok(Some(event)),
            Ok(LineOutcome::Blank) => {}
            Ok(LineOutcome::Skipped(kind)) => {
                debug!("skipping {kind} at line {}", source.line_no);
            }
            Err(err) => {
                return Err(CandumpSourceError::Line {
                    line: source.line_no,
                    source: err,
                });
            }
        }
    }
    Ok(None)
}
