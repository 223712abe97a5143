//! CAN-FIX Node Specific Message decoding and encoding.
//!
//! Node `n` sends on identifier `0x700 + n`; the first payload byte is the
//! control code and, for the codecs implemented here, the second one is the
//! addressee. Request and response share a control code and are told apart
//! only by frame length and sentinel argument bytes, so each codec performs
//! that disambiguation once at decode time and yields a role-tagged value.
//!
//! Byte offsets and sentinel values live in `layout`, bounds-checked access in
//! `reader`, the codec table and message sum type in `parser`, and the
//! control code names in `codes`. Construction validates every field up front,
//! so a value that exists can always be encoded.

pub mod bitrate;
pub mod codes;
pub mod envelope;
pub mod error;
pub mod identification;
pub mod layout;
pub mod node_id;
pub mod parser;
pub mod reader;

pub use bitrate::{BitRate, BitRateRole, BitRateSet};
pub use codes::{ControlCodeClass, describe};
pub use envelope::NodeSpecific;
pub use error::NsmError;
pub use identification::{DeviceInfo, Identification, NodeIdentification};
pub use node_id::{NodeIdRole, NodeIdSet};
pub use parser::{
    MsgType, NodeSpecificCodec, NodeSpecificMessage, Status, parse_envelope, parse_node_specific,
};
