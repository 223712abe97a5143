use std::fmt;

use super::bitrate::BitRateSet;
use super::envelope::NodeSpecific;
use super::error::NsmError;
use super::identification::NodeIdentification;
use super::node_id::NodeIdSet;
use crate::frame::CanFrame;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MsgType {
    Request,
    Response,
}

impl MsgType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MsgType::Request => "request",
            MsgType::Response => "response",
        }
    }
}

/// Outcome carried by a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Success,
    Fail,
}

/// A message kind with its own layout under one control code.
///
/// Implementors decode from and encode to the generic envelope; frame-level
/// helpers are provided on top of that.
pub trait NodeSpecificCodec: Sized {
    const CONTROL_CODE: u8;

    fn from_envelope(envelope: &NodeSpecific) -> Result<Self, NsmError>;

    fn to_envelope(&self) -> Result<NodeSpecific, NsmError>;

    /// An empty frame has no layout under any control code, so it is a size
    /// error here rather than the envelope's `TooShort`.
    fn decode(frame: &CanFrame) -> Result<Self, NsmError> {
        let envelope = NodeSpecific::decode(frame).map_err(|err| match err {
            NsmError::TooShort { actual: 0, .. } => NsmError::MsgSize {
                control_code: Self::CONTROL_CODE,
                dlc: 0,
            },
            other => other,
        })?;
        Self::from_envelope(&envelope)
    }

    fn encode(&self) -> Result<CanFrame, NsmError> {
        self.to_envelope()?.to_frame()
    }
}

/// Any decoded node specific message.
///
/// Control codes without a registered codec stay as the generic envelope.
/// `Other` only ever holds such codes: `parse_envelope` never produces it for
/// a registered code, and encoding one is refused with
/// [`NsmError::RegisteredControlCode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeSpecificMessage {
    Identification(NodeIdentification),
    BitRateSet(BitRateSet),
    NodeIdSet(NodeIdSet),
    Other(NodeSpecific),
}

impl NodeSpecificMessage {
    pub fn send_node(&self) -> u8 {
        match self {
            NodeSpecificMessage::Identification(msg) => msg.send_node,
            NodeSpecificMessage::BitRateSet(msg) => msg.send_node,
            NodeSpecificMessage::NodeIdSet(msg) => msg.send_node,
            NodeSpecificMessage::Other(envelope) => envelope.send_node(),
        }
    }

    /// Addressee, when the variant defines one.
    pub fn dest_node(&self) -> Option<u8> {
        match self {
            NodeSpecificMessage::Identification(msg) => Some(msg.dest_node),
            NodeSpecificMessage::BitRateSet(msg) => Some(msg.dest_node),
            NodeSpecificMessage::NodeIdSet(msg) => Some(msg.dest_node),
            NodeSpecificMessage::Other(_) => None,
        }
    }

    pub fn control_code(&self) -> u8 {
        match self {
            NodeSpecificMessage::Identification(_) => NodeIdentification::CONTROL_CODE,
            NodeSpecificMessage::BitRateSet(_) => BitRateSet::CONTROL_CODE,
            NodeSpecificMessage::NodeIdSet(_) => NodeIdSet::CONTROL_CODE,
            NodeSpecificMessage::Other(envelope) => envelope.control_code(),
        }
    }

    pub fn msg_type(&self) -> Option<MsgType> {
        match self {
            NodeSpecificMessage::Identification(msg) => Some(msg.msg_type()),
            NodeSpecificMessage::BitRateSet(msg) => Some(msg.msg_type()),
            NodeSpecificMessage::NodeIdSet(msg) => Some(msg.msg_type()),
            NodeSpecificMessage::Other(_) => None,
        }
    }

    pub fn to_envelope(&self) -> Result<NodeSpecific, NsmError> {
        match self {
            NodeSpecificMessage::Identification(msg) => msg.to_envelope(),
            NodeSpecificMessage::BitRateSet(msg) => msg.to_envelope(),
            NodeSpecificMessage::NodeIdSet(msg) => msg.to_envelope(),
            NodeSpecificMessage::Other(envelope) if has_codec(envelope.control_code()) => {
                Err(NsmError::RegisteredControlCode {
                    control_code: envelope.control_code(),
                })
            }
            NodeSpecificMessage::Other(envelope) => Ok(envelope.clone()),
        }
    }

    pub fn to_frame(&self) -> Result<CanFrame, NsmError> {
        self.to_envelope()?.to_frame()
    }
}

impl fmt::Display for NodeSpecificMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeSpecificMessage::Identification(msg) => fmt::Display::fmt(msg, f),
            NodeSpecificMessage::BitRateSet(msg) => fmt::Display::fmt(msg, f),
            NodeSpecificMessage::NodeIdSet(msg) => fmt::Display::fmt(msg, f),
            NodeSpecificMessage::Other(envelope) => fmt::Display::fmt(envelope, f),
        }
    }
}

impl From<NodeIdentification> for NodeSpecificMessage {
    fn from(value: NodeIdentification) -> Self {
        NodeSpecificMessage::Identification(value)
    }
}

impl From<BitRateSet> for NodeSpecificMessage {
    fn from(value: BitRateSet) -> Self {
        NodeSpecificMessage::BitRateSet(value)
    }
}

impl From<NodeIdSet> for NodeSpecificMessage {
    fn from(value: NodeIdSet) -> Self {
        NodeSpecificMessage::NodeIdSet(value)
    }
}

type DecodeFn = fn(&NodeSpecific) -> Result<NodeSpecificMessage, NsmError>;

struct Codec {
    control_code: u8,
    decode: DecodeFn,
}

const fn codec<C>() -> Codec
where
    C: NodeSpecificCodec + Into<NodeSpecificMessage>,
{
    Codec {
        control_code: C::CONTROL_CODE,
        decode: decode_as::<C>,
    }
}

fn decode_as<C>(envelope: &NodeSpecific) -> Result<NodeSpecificMessage, NsmError>
where
    C: NodeSpecificCodec + Into<NodeSpecificMessage>,
{
    C::from_envelope(envelope).map(Into::into)
}

const CODECS: &[Codec] = &[
    codec::<NodeIdentification>(),
    codec::<BitRateSet>(),
    codec::<NodeIdSet>(),
];

/// Whether a dedicated codec exists for `control_code`.
pub fn has_codec(control_code: u8) -> bool {
    CODECS.iter().any(|c| c.control_code == control_code)
}

/// Decode an already-split envelope into its concrete variant.
pub fn parse_envelope(envelope: NodeSpecific) -> Result<NodeSpecificMessage, NsmError> {
    match CODECS
        .iter()
        .find(|c| c.control_code == envelope.control_code())
    {
        Some(codec) => (codec.decode)(&envelope),
        None => Ok(NodeSpecificMessage::Other(envelope)),
    }
}

/// Decode a frame in the node specific range.
///
/// # Examples
/// ```
/// use canfix_core::{CanFrame, MsgType, NodeSpecificMessage, parse_node_specific};
///
/// let frame = CanFrame::new(1793, &[0x00, 0x05])?;
/// let msg = parse_node_specific(&frame)?;
/// assert!(matches!(msg, NodeSpecificMessage::Identification(_)));
/// assert_eq!(msg.send_node(), 1);
/// assert_eq!(msg.dest_node(), Some(5));
/// assert_eq!(msg.msg_type(), Some(MsgType::Request));
/// assert_eq!(msg.to_frame()?, frame);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_node_specific(frame: &CanFrame) -> Result<NodeSpecificMessage, NsmError> {
    parse_envelope(NodeSpecific::decode(frame)?)
}
