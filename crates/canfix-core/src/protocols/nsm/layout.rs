use std::ops::Range;

/// First identifier of the node specific range; node `n` sends on `BASE_OFFSET + n`.
pub const BASE_OFFSET: u16 = 0x700;
pub const LAST_ADDRESS: u16 = BASE_OFFSET + 0xFF;

// Offsets within the full frame payload.
pub const CONTROL_CODE_OFFSET: usize = 0;
pub const DEST_NODE_OFFSET: usize = 1;
pub const ARGUMENT_OFFSET: usize = 2;

/// Bytes that may follow the control code.
pub const MAX_ENVELOPE_PAYLOAD: usize = 7;

pub const IDENTIFICATION_REQUEST_DLC: usize = 2;
pub const IDENTIFICATION_RESPONSE_DLC: usize = 8;
pub const REVISION_OFFSET: usize = 2;
pub const DEVICE_OFFSET: usize = 3;
pub const FWREV_OFFSET: usize = 4;
pub const MODEL_RANGE: Range<usize> = 5..8;
pub const PROTOCOL_REVISION: u8 = 0x01;
pub const MAX_MODEL: u32 = 0x00FF_FFFF;

pub const BIT_RATE_SUCCESS_DLC: usize = 2;
pub const BIT_RATE_ARGUMENT_DLC: usize = 3;
pub const BIT_RATE_FAIL: u8 = 0xFF;

pub const NODE_ID_SET_DLC: usize = 3;
pub const NODE_ID_SET_ACK: u8 = 0x00;
