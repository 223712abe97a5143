use std::fmt;
use std::num::NonZeroU8;

use super::codes;
use super::envelope::NodeSpecific;
use super::error::NsmError;
use super::layout;
use super::parser::{MsgType, NodeSpecificCodec};
use super::reader::{NsmReader, checked_u8};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeIdRole {
    Request(NonZeroU8),
    Response,
}

/// Node ID Set (control code 2).
///
/// Always three bytes long: a non-zero argument is the node number being
/// assigned, zero acknowledges the change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeIdSet {
    pub send_node: u8,
    pub dest_node: u8,
    pub role: NodeIdRole,
}

impl NodeIdSet {
    pub fn request(send_node: u8, dest_node: u8, new_node: NonZeroU8) -> Self {
        Self {
            send_node,
            dest_node,
            role: NodeIdRole::Request(new_node),
        }
    }

    /// Builds a request from an unchecked node number (1..=255).
    ///
    /// # Examples
    /// ```
    /// use canfix_core::NodeIdSet;
    ///
    /// assert!(NodeIdSet::try_request(1, 2, 255).is_ok());
    /// assert!(NodeIdSet::try_request(1, 2, 0).is_err());
    /// assert!(NodeIdSet::try_request(1, 2, 256).is_err());
    /// ```
    pub fn try_request(send_node: u8, dest_node: u8, new_node: u32) -> Result<Self, NsmError> {
        let out_of_range = NsmError::FieldRange {
            field: "newnode",
            value: new_node,
            expected: "1..=255",
        };
        let byte = checked_u8("newnode", new_node).map_err(|_| out_of_range.clone())?;
        let new_node = NonZeroU8::new(byte).ok_or(out_of_range)?;
        Ok(Self::request(send_node, dest_node, new_node))
    }

    pub fn response(send_node: u8, dest_node: u8) -> Self {
        Self {
            send_node,
            dest_node,
            role: NodeIdRole::Response,
        }
    }

    pub fn msg_type(&self) -> MsgType {
        match self.role {
            NodeIdRole::Request(_) => MsgType::Request,
            NodeIdRole::Response => MsgType::Response,
        }
    }

    pub fn new_node(&self) -> Option<u8> {
        match self.role {
            NodeIdRole::Request(node) => Some(node.get()),
            NodeIdRole::Response => None,
        }
    }
}

impl NodeSpecificCodec for NodeIdSet {
    const CONTROL_CODE: u8 = codes::NODE_ID_SET;

    fn from_envelope(envelope: &NodeSpecific) -> Result<Self, NsmError> {
        envelope.expect_control_code(Self::CONTROL_CODE)?;
        let bytes = envelope.frame_bytes();
        let reader = NsmReader::new(&bytes);
        if reader.dlc() != layout::NODE_ID_SET_DLC {
            return Err(NsmError::MsgSize {
                control_code: Self::CONTROL_CODE,
                dlc: reader.dlc(),
            });
        }
        let role = match NonZeroU8::new(reader.read_u8(layout::ARGUMENT_OFFSET)?) {
            Some(node) => NodeIdRole::Request(node),
            None => NodeIdRole::Response,
        };
        Ok(Self {
            send_node: envelope.send_node(),
            dest_node: reader.read_u8(layout::DEST_NODE_OFFSET)?,
            role,
        })
    }

    fn to_envelope(&self) -> Result<NodeSpecific, NsmError> {
        let argument = match self.role {
            NodeIdRole::Request(node) => node.get(),
            NodeIdRole::Response => layout::NODE_ID_SET_ACK,
        };
        NodeSpecific::new(
            self.send_node,
            Self::CONTROL_CODE,
            &[self.dest_node, argument],
        )
    }
}

impl fmt::Display for NodeIdSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}]->[{}] {}: ",
            self.send_node,
            self.dest_node,
            codes::describe(Self::CONTROL_CODE)
        )?;
        match self.role {
            NodeIdRole::Request(node) => write!(f, "request new node id={node}"),
            NodeIdRole::Response => write!(f, "Success Response"),
        }
    }
}
