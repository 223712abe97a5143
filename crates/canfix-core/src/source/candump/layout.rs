pub const FRAME_SEPARATOR: char = '#';
pub const COMMENT_PREFIX: char = '#';
pub const DATA_BYTE_SEPARATOR: char = '.';
pub const REMOTE_FRAME_MARKER: char = 'R';

pub const TIMESTAMP_OPEN: char = '(';
pub const TIMESTAMP_CLOSE: char = ')';
/// candump writes microsecond resolution.
pub const TIMESTAMP_FRACTION_DIGITS: usize = 6;

pub const STANDARD_ID_DIGITS: usize = 3;
pub const EXTENDED_ID_DIGITS: usize = 8;
