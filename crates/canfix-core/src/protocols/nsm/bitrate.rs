use std::fmt;

use super::codes;
use super::envelope::NodeSpecific;
use super::error::NsmError;
use super::layout;
use super::parser::{MsgType, NodeSpecificCodec, Status};
use super::reader::NsmReader;

/// Bus bit rates and their protocol codes.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitRate {
    Kbps125 = 1,
    Kbps250 = 2,
    Kbps500 = 3,
    Kbps1000 = 4,
}

const BIT_RATES: [(BitRate, u16); 4] = [
    (BitRate::Kbps125, 125),
    (BitRate::Kbps250, 250),
    (BitRate::Kbps500, 500),
    (BitRate::Kbps1000, 1000),
];

impl BitRate {
    /// Accepts either a protocol code (1..=4) or a rate in kbps.
    ///
    /// # Examples
    /// ```
    /// use canfix_core::BitRate;
    ///
    /// assert_eq!(BitRate::new(500)?, BitRate::new(3)?);
    /// assert!(BitRate::new(5).is_err());
    /// # Ok::<(), canfix_core::NsmError>(())
    /// ```
    pub fn new(value: u32) -> Result<Self, NsmError> {
        let found = BIT_RATES.iter().find(|(rate, kbps)| {
            value == *rate as u32 || value == u32::from(*kbps)
        });
        match found {
            Some((rate, _)) => Ok(*rate),
            None => Err(NsmError::FieldRange {
                field: "bitrate",
                value,
                expected: "1..=4 or 125, 250, 500, 1000 kbps",
            }),
        }
    }

    /// Strict lookup of a protocol code as carried on the wire.
    ///
    /// Unlike [`BitRate::new`], kbps values are not accepted here: a request
    /// byte of 125 or 250 is a `FieldRange` error, not a synonym for codes 1
    /// or 2.
    pub fn from_code(code: u8) -> Result<Self, NsmError> {
        BIT_RATES
            .iter()
            .map(|(rate, _)| *rate)
            .find(|rate| *rate as u8 == code)
            .ok_or(NsmError::FieldRange {
                field: "bitrate",
                value: code.into(),
                expected: "1..=4",
            })
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }

    pub fn kbps(&self) -> u16 {
        BIT_RATES
            .iter()
            .find(|(rate, _)| rate == self)
            .map(|(_, kbps)| *kbps)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitRateRole {
    Request(BitRate),
    Response(Status),
}

/// Bit Rate Set (control code 1).
///
/// Requests carry the new rate code; a bare two byte frame acknowledges
/// success and a trailing `0xFF` reports failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitRateSet {
    pub send_node: u8,
    pub dest_node: u8,
    pub role: BitRateRole,
}

impl BitRateSet {
    pub fn request(send_node: u8, dest_node: u8, bitrate: BitRate) -> Self {
        Self {
            send_node,
            dest_node,
            role: BitRateRole::Request(bitrate),
        }
    }

    pub fn success(send_node: u8, dest_node: u8) -> Self {
        Self {
            send_node,
            dest_node,
            role: BitRateRole::Response(Status::Success),
        }
    }

    pub fn failure(send_node: u8, dest_node: u8) -> Self {
        Self {
            send_node,
            dest_node,
            role: BitRateRole::Response(Status::Fail),
        }
    }

    pub fn msg_type(&self) -> MsgType {
        match self.role {
            BitRateRole::Request(_) => MsgType::Request,
            BitRateRole::Response(_) => MsgType::Response,
        }
    }

    pub fn bitrate(&self) -> Option<BitRate> {
        match self.role {
            BitRateRole::Request(rate) => Some(rate),
            BitRateRole::Response(_) => None,
        }
    }

    pub fn status(&self) -> Option<Status> {
        match self.role {
            BitRateRole::Request(_) => None,
            BitRateRole::Response(status) => Some(status),
        }
    }
}

impl NodeSpecificCodec for BitRateSet {
    const CONTROL_CODE: u8 = codes::BIT_RATE_SET;

    fn from_envelope(envelope: &NodeSpecific) -> Result<Self, NsmError> {
        envelope.expect_control_code(Self::CONTROL_CODE)?;
        let bytes = envelope.frame_bytes();
        let reader = NsmReader::new(&bytes);
        let role = match reader.dlc() {
            layout::BIT_RATE_SUCCESS_DLC => BitRateRole::Response(Status::Success),
            layout::BIT_RATE_ARGUMENT_DLC => match reader.read_u8(layout::ARGUMENT_OFFSET)? {
                layout::BIT_RATE_FAIL => BitRateRole::Response(Status::Fail),
                code => BitRateRole::Request(BitRate::from_code(code)?),
            },
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
        let payload = match self.role {
            BitRateRole::Request(rate) => vec![self.dest_node, rate.code()],
            BitRateRole::Response(Status::Fail) => vec![self.dest_node, layout::BIT_RATE_FAIL],
            BitRateRole::Response(Status::Success) => vec![self.dest_node],
        };
        NodeSpecific::new(self.send_node, Self::CONTROL_CODE, &payload)
    }
}

impl fmt::Display for BitRateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}]->[{}] {}: ",
            self.send_node,
            self.dest_node,
            codes::describe(Self::CONTROL_CODE)
        )?;
        match self.role {
            BitRateRole::Request(rate) => write!(f, "request bitrate={}kbps", rate.kbps()),
            BitRateRole::Response(Status::Success) => write!(f, "Success Response"),
            BitRateRole::Response(Status::Fail) => write!(f, "Failure Response"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BitRate, BitRateSet};
    use crate::frame::CanFrame;
    use crate::protocols::nsm::error::NsmError;
    use crate::protocols::nsm::parser::{MsgType, NodeSpecificCodec, Status};

    fn decode(data: &[u8]) -> Result<BitRateSet, NsmError> {
        let frame = CanFrame::new(0x710, data).unwrap();
        BitRateSet::decode(&frame)
    }

    #[test]
    fn two_bytes_is_success_response() {
        let msg = decode(&[0x01, 0x20]).unwrap();
        assert_eq!(msg.msg_type(), MsgType::Response);
        assert_eq!(msg.status(), Some(Status::Success));
        assert_eq!(msg.dest_node, 0x20);
        assert_eq!(msg.send_node, 0x10);
    }

    #[test]
    fn sentinel_is_failure_response() {
        let msg = decode(&[0x01, 0x20, 0xFF]).unwrap();
        assert_eq!(msg.status(), Some(Status::Fail));
        assert_eq!(msg.bitrate(), None);
    }

    #[test]
    fn other_third_byte_is_request() {
        let msg = decode(&[0x01, 0x20, 0x02]).unwrap();
        assert_eq!(msg.msg_type(), MsgType::Request);
        assert_eq!(msg.bitrate(), Some(BitRate::Kbps250));
        assert_eq!(msg.bitrate().map(|rate| rate.kbps()), Some(250));
    }

    #[test]
    fn kbps_values_are_not_wire_codes() {
        for kbps in [125u8, 250] {
            assert!(BitRate::from_code(kbps).is_err());
            assert!(BitRate::new(kbps.into()).is_ok());
        }
        let err = decode(&[0x01, 0x20, 250]).unwrap_err();
        assert_eq!(
            err,
            NsmError::FieldRange {
                field: "bitrate",
                value: 250,
                expected: "1..=4"
            }
        );
    }

    #[test]
    fn unknown_wire_code_is_range_error() {
        for code in [0u8, 5, 125] {
            let err = decode(&[0x01, 0x20, code]).unwrap_err();
            assert!(matches!(err, NsmError::FieldRange { field: "bitrate", .. }));
        }
    }

    #[test]
    fn other_lengths_are_size_errors() {
        assert!(matches!(decode(&[0x01]), Err(NsmError::MsgSize { dlc: 1, .. })));
        assert!(matches!(
            decode(&[0x01, 0x20, 0x02, 0x00]),
            Err(NsmError::MsgSize { dlc: 4, .. })
        ));
    }

    #[test]
    fn kbps_and_code_are_synonyms() {
        for (kbps, code) in [(125, 1), (250, 2), (500, 3), (1000, 4)] {
            assert_eq!(BitRate::new(kbps).unwrap(), BitRate::new(code).unwrap());
            assert_eq!(BitRate::new(kbps).unwrap().code() as u32, code);
        }
        assert!(BitRate::new(0).is_err());
        assert!(BitRate::new(100).is_err());
    }

    #[test]
    fn encode_each_role() {
        let request = BitRateSet::request(1, 2, BitRate::Kbps1000).encode().unwrap();
        assert_eq!(request.data(), &[0x01, 0x02, 0x04]);
        let failure = BitRateSet::failure(2, 1).encode().unwrap();
        assert_eq!(failure.data(), &[0x01, 0x01, 0xFF]);
        let success = BitRateSet::success(2, 1).encode().unwrap();
        assert_eq!(success.data(), &[0x01, 0x01]);
        assert_eq!(success.id(), 0x702);
    }

    #[test]
    fn display_summaries() {
        let request = BitRateSet::request(1, 2, BitRate::Kbps500);
        assert_eq!(
            request.to_string(),
            "[1]->[2] Bit Rate Set: request bitrate=500kbps"
        );
        assert_eq!(
            BitRateSet::success(2, 1).to_string(),
            "[2]->[1] Bit Rate Set: Success Response"
        );
        assert_eq!(
            BitRateSet::failure(2, 1).to_string(),
            "[2]->[1] Bit Rate Set: Failure Response"
        );
    }
}
