//! Classic CAN data frame with an 11-bit identifier.
//!
//! This is the frame interface the codec consumes and produces. Bus access,
//! arbitration and timing belong to whatever adapter hands frames in and out.

use std::fmt;

use embedded_can::{Frame, Id, StandardId};
use thiserror::Error;

/// Maximum payload length of a classic CAN frame.
pub const MAX_DLC: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("invalid standard identifier: 0x{id:x} exceeds 0x7ff")]
    InvalidId { id: u32 },
    #[error("payload too long: {len} bytes, at most 8 allowed")]
    PayloadTooLong { len: usize },
}

/// A CAN data frame: identifier, data length code and up to eight bytes.
///
/// # Examples
/// ```
/// use canfix_core::CanFrame;
///
/// let frame = CanFrame::new(0x701, &[0x00, 0x05])?;
/// assert_eq!(frame.id(), 1793);
/// assert_eq!(frame.dlc(), 2);
/// assert_eq!(frame.data(), &[0x00, 0x05]);
/// # Ok::<(), canfix_core::FrameError>(())
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanFrame {
    id: StandardId,
    dlc: usize,
    data: [u8; MAX_DLC],
}

impl CanFrame {
    /// Creates a new data frame from a raw 11-bit identifier.
    pub fn new(id: u32, data: &[u8]) -> Result<Self, FrameError> {
        let id = u16::try_from(id)
            .ok()
            .and_then(StandardId::new)
            .ok_or(FrameError::InvalidId { id })?;
        Self::with_id(id, data)
    }

    /// Creates a new data frame; extended identifiers are rejected.
    pub fn with_id(id: impl Into<Id>, data: &[u8]) -> Result<Self, FrameError> {
        let id = match id.into() {
            Id::Standard(id) => id,
            Id::Extended(id) => return Err(FrameError::InvalidId { id: id.as_raw() }),
        };
        if data.len() > MAX_DLC {
            return Err(FrameError::PayloadTooLong { len: data.len() });
        }
        let mut frame = Self {
            id,
            dlc: data.len(),
            data: [0; MAX_DLC],
        };
        frame.data[..data.len()].copy_from_slice(data);
        Ok(frame)
    }

    /// Raw identifier; [`Frame::id`] gives the typed one.
    pub fn id(&self) -> u16 {
        self.id.as_raw()
    }

    pub fn standard_id(&self) -> StandardId {
        self.id
    }

    /// Number of payload bytes.
    pub fn dlc(&self) -> usize {
        self.dlc
    }

    /// The frame data (0..8 bytes in length).
    pub fn data(&self) -> &[u8] {
        &self.data[..self.dlc]
    }
}

impl Frame for CanFrame {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        Self::with_id(id, data).ok()
    }

    /// Remote frames carry no node specific payload.
    fn new_remote(_id: impl Into<Id>, _dlc: usize) -> Option<Self> {
        None
    }

    fn is_extended(&self) -> bool {
        false
    }

    fn is_remote_frame(&self) -> bool {
        false
    }

    fn id(&self) -> Id {
        Id::Standard(self.id)
    }

    fn dlc(&self) -> usize {
        self.dlc
    }

    fn data(&self) -> &[u8] {
        &self.data[..self.dlc]
    }
}

impl fmt::Debug for CanFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanFrame")
            .field("id", &format_args!("0x{:03x}", self.id.as_raw()))
            .field("dlc", &self.dlc)
            .field("data", &self.data())
            .finish()
    }
}

/// Formats the frame the way `cansend` accepts it, e.g. `701#0005`.
impl fmt::Display for CanFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03X}#", self.id.as_raw())?;
        for byte in self.data() {
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}
