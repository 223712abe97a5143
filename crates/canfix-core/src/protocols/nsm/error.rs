use thiserror::Error;

use crate::frame::FrameError;

/// Errors returned by Node Specific Message decoding and construction.
///
/// # Examples
/// ```
/// use canfix_core::NsmError;
///
/// let err = NsmError::MsgSize { control_code: 2, dlc: 4 };
/// assert!(err.to_string().contains("message size"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NsmError {
    #[error("message size {dlc} is invalid for control code {control_code}")]
    MsgSize { control_code: u8, dlc: usize },
    #[error("{field} out of range: {value} (expected {expected})")]
    FieldRange {
        field: &'static str,
        value: u32,
        expected: &'static str,
    },
    #[error("address 0x{address:03x} is outside the node specific range 0x700..=0x7ff")]
    AddressRange { address: u16 },
    #[error("payload too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
    #[error("payload too long: {len} bytes after the control code, at most 7 allowed")]
    PayloadTooLong { len: usize },
    #[error("control code mismatch: expected {expected}, got {actual}")]
    ControlCodeMismatch { expected: u8, actual: u8 },
    #[error("control code {control_code} has a dedicated codec and cannot be sent as a generic message")]
    RegisteredControlCode { control_code: u8 },
    #[error("invalid frame: {0}")]
    Frame(#[from] FrameError),
}
