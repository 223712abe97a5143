use std::fmt;

use embedded_can::StandardId;
use log::debug;

use super::codes;
use super::error::NsmError;
use super::layout;
use super::reader::NsmReader;
use crate::frame::CanFrame;

/// Generic node specific message: sending node, control code and the
/// remaining payload, left uninterpreted.
///
/// # Examples
/// ```
/// use canfix_core::{CanFrame, NodeSpecific};
///
/// let frame = CanFrame::new(1793, &[0x00, 0x05])?;
/// let envelope = NodeSpecific::decode(&frame)?;
/// assert_eq!(envelope.send_node(), 1);
/// assert_eq!(envelope.control_code(), 0);
/// assert_eq!(envelope.payload(), &[0x05]);
/// assert_eq!(envelope.to_frame()?, frame);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSpecific {
    send_node: u8,
    control_code: u8,
    payload: Vec<u8>,
}

impl NodeSpecific {
    pub fn new(send_node: u8, control_code: u8, payload: &[u8]) -> Result<Self, NsmError> {
        if payload.len() > layout::MAX_ENVELOPE_PAYLOAD {
            return Err(NsmError::PayloadTooLong { len: payload.len() });
        }
        Ok(Self {
            send_node,
            control_code,
            payload: payload.to_vec(),
        })
    }

    pub fn decode(frame: &CanFrame) -> Result<Self, NsmError> {
        let send_node = node_for_address(frame.standard_id())?;
        let reader = NsmReader::new(frame.data());
        let control_code = reader.read_u8(layout::CONTROL_CODE_OFFSET)?;
        let payload = reader.read_slice(layout::CONTROL_CODE_OFFSET + 1..reader.dlc())?;
        debug!("node specific frame {frame} from node {send_node}");
        Ok(Self {
            send_node,
            control_code,
            payload: payload.to_vec(),
        })
    }

    pub fn to_frame(&self) -> Result<CanFrame, NsmError> {
        let data = self.frame_bytes();
        Ok(CanFrame::new(address_for_node(self.send_node).into(), &data)?)
    }

    pub fn send_node(&self) -> u8 {
        self.send_node
    }

    pub fn control_code(&self) -> u8 {
        self.control_code
    }

    /// Bytes following the control code.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Frame length including the control code byte.
    pub fn dlc(&self) -> usize {
        self.payload.len() + 1
    }

    /// Full frame payload, control code first, for layout-relative reads.
    pub(crate) fn frame_bytes(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.dlc());
        data.push(self.control_code);
        data.extend_from_slice(&self.payload);
        data
    }

    pub(crate) fn expect_control_code(&self, expected: u8) -> Result<(), NsmError> {
        if self.control_code != expected {
            return Err(NsmError::ControlCodeMismatch {
                expected,
                actual: self.control_code,
            });
        }
        Ok(())
    }
}

impl fmt::Display for NodeSpecific {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}",
            self.send_node,
            codes::describe(self.control_code)
        )?;
        for byte in &self.payload {
            write!(f, " 0x{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Node number for a frame identifier in the node specific range.
pub fn node_for_address(id: StandardId) -> Result<u8, NsmError> {
    let address = id.as_raw();
    if !(layout::BASE_OFFSET..=layout::LAST_ADDRESS).contains(&address) {
        return Err(NsmError::AddressRange { address });
    }
    Ok((address - layout::BASE_OFFSET) as u8)
}

pub fn address_for_node(node: u8) -> u16 {
    layout::BASE_OFFSET + u16::from(node)
}

#[cfg(test)]
mod tests {
    use embedded_can::StandardId;

    use super::{NodeSpecific, address_for_node, node_for_address};
    use crate::frame::CanFrame;
    use crate::protocols::nsm::error::NsmError;

    #[test]
    fn decode_splits_control_code_and_payload() {
        let frame = CanFrame::new(0x7ff, &[0x85, 1, 2, 3]).unwrap();
        let envelope = NodeSpecific::decode(&frame).unwrap();
        assert_eq!(envelope.send_node(), 255);
        assert_eq!(envelope.control_code(), 0x85);
        assert_eq!(envelope.payload(), &[1, 2, 3]);
        assert_eq!(envelope.dlc(), 4);
    }

    #[test]
    fn decode_rejects_address_below_range() {
        let frame = CanFrame::new(0x6ff, &[0x00]).unwrap();
        let err = NodeSpecific::decode(&frame).unwrap_err();
        assert_eq!(err, NsmError::AddressRange { address: 0x6ff });
    }

    #[test]
    fn decode_rejects_empty_payload() {
        let frame = CanFrame::new(0x701, &[]).unwrap();
        let err = NodeSpecific::decode(&frame).unwrap_err();
        assert!(matches!(err, NsmError::TooShort { needed: 1, actual: 0 }));
    }

    #[test]
    fn encode_adds_base_offset() {
        let envelope = NodeSpecific::new(0, 6, &[0xaa]).unwrap();
        let frame = envelope.to_frame().unwrap();
        assert_eq!(frame.id(), 0x700);
        assert_eq!(frame.data(), &[6, 0xaa]);
        assert_eq!(frame.dlc(), 2);
    }

    #[test]
    fn new_rejects_eight_payload_bytes() {
        let err = NodeSpecific::new(1, 0, &[0; 8]).unwrap_err();
        assert_eq!(err, NsmError::PayloadTooLong { len: 8 });
    }

    #[test]
    fn address_mapping_covers_all_nodes() {
        for node in 0..=u8::MAX {
            let id = StandardId::new(address_for_node(node)).unwrap();
            assert_eq!(node_for_address(id).unwrap(), node);
        }
    }

    #[test]
    fn display_lists_raw_bytes() {
        let envelope = NodeSpecific::new(3, 50, &[0x05, 0xff]).unwrap();
        assert_eq!(envelope.to_string(), "[3] Reserved NSM 50 0x05 0xff");
        let envelope = NodeSpecific::new(4, 6, &[]).unwrap();
        assert_eq!(envelope.to_string(), "[4] Node Status");
    }
}
