use std::fmt;

use log::debug;

use super::codes;
use super::envelope::NodeSpecific;
use super::error::NsmError;
use super::layout;
use super::parser::{MsgType, NodeSpecificCodec};
use super::reader::{NsmReader, checked_u8, u24_le_bytes};

/// Identification data a node reports about itself.
///
/// # Examples
/// ```
/// use canfix_core::DeviceInfo;
///
/// let info = DeviceInfo::new(0x12, 3, 0xFF_FFFF)?;
/// assert_eq!(info.model(), 0xFF_FFFF);
/// assert!(DeviceInfo::new(256, 3, 0).is_err());
/// assert!(DeviceInfo::new(1, 3, 0x100_0000).is_err());
/// # Ok::<(), canfix_core::NsmError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceInfo {
    device: u8,
    fwrev: u8,
    model: u32,
}

impl DeviceInfo {
    /// Validates every field before building; nothing is kept on error.
    pub fn new(device: u32, fwrev: u32, model: u32) -> Result<Self, NsmError> {
        let device = checked_u8("device", device)?;
        let fwrev = checked_u8("fwrev", fwrev)?;
        if model > layout::MAX_MODEL {
            return Err(NsmError::FieldRange {
                field: "model",
                value: model,
                expected: "0..=0xFFFFFF",
            });
        }
        Ok(Self {
            device,
            fwrev,
            model,
        })
    }

    pub fn device(&self) -> u8 {
        self.device
    }

    pub fn fwrev(&self) -> u8 {
        self.fwrev
    }

    pub fn model(&self) -> u32 {
        self.model
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Identification {
    Request,
    Response(DeviceInfo),
}

/// Node Identification (control code 0).
///
/// A two byte frame asks `dest_node` to identify itself; the eight byte
/// answer carries the specification revision, device, firmware revision and
/// a 24-bit model number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeIdentification {
    pub send_node: u8,
    pub dest_node: u8,
    pub role: Identification,
}

impl NodeIdentification {
    pub fn request(send_node: u8, dest_node: u8) -> Self {
        Self {
            send_node,
            dest_node,
            role: Identification::Request,
        }
    }

    pub fn response(send_node: u8, dest_node: u8, info: DeviceInfo) -> Self {
        Self {
            send_node,
            dest_node,
            role: Identification::Response(info),
        }
    }

    pub fn msg_type(&self) -> MsgType {
        match self.role {
            Identification::Request => MsgType::Request,
            Identification::Response(_) => MsgType::Response,
        }
    }

    pub fn device_info(&self) -> Option<&DeviceInfo> {
        match &self.role {
            Identification::Request => None,
            Identification::Response(info) => Some(info),
        }
    }
}

impl NodeSpecificCodec for NodeIdentification {
    const CONTROL_CODE: u8 = codes::NODE_IDENTIFICATION;

    fn from_envelope(envelope: &NodeSpecific) -> Result<Self, NsmError> {
        envelope.expect_control_code(Self::CONTROL_CODE)?;
        let bytes = envelope.frame_bytes();
        let reader = NsmReader::new(&bytes);
        let role = match reader.dlc() {
            layout::IDENTIFICATION_REQUEST_DLC => Identification::Request,
            layout::IDENTIFICATION_RESPONSE_DLC => {
                let revision = reader.read_u8(layout::REVISION_OFFSET)?;
                if revision != layout::PROTOCOL_REVISION {
                    debug!(
                        "node {} reports specification revision {revision}",
                        envelope.send_node()
                    );
                }
                Identification::Response(DeviceInfo {
                    device: reader.read_u8(layout::DEVICE_OFFSET)?,
                    fwrev: reader.read_u8(layout::FWREV_OFFSET)?,
                    model: reader.read_u24_le(layout::MODEL_RANGE.clone())?,
                })
            }
            dlc => {
                return Err(NsmError::MsgSize {
                    control_code: Self::CONTROL_CODE,
                    dlc,
                });
            }
        };
        Ok(Self {
            send_node: envelope.send_node(),
            dest_node: reader.read_u8(layout::DEST_NODE_OFFSET)?,
            role,
        })
    }

    fn to_envelope(&self) -> Result<NodeSpecific, NsmError> {
        let mut payload = vec![self.dest_node];
        if let Identification::Response(info) = &self.role {
            payload.extend_from_slice(&[layout::PROTOCOL_REVISION, info.device, info.fwrev]);
            payload.extend_from_slice(&u24_le_bytes(info.model));
        }
        NodeSpecific::new(self.send_node, Self::CONTROL_CODE, &payload)
    }
}

impl fmt::Display for NodeIdentification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}]->[{}] {}: ",
            self.send_node,
            self.dest_node,
            codes::describe(Self::CONTROL_CODE)
        )?;
        match &self.role {
            Identification::Request => write!(f, "request"),
            Identification::Response(info) => write!(
                f,
                "device={}, fwrev={}, model={}",
                info.device, info.fwrev, info.model
            ),
        }
    }
}
