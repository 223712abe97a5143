use crate::MessageRecord;
use crate::protocols::nsm::{BitRateRole, NodeSpecificMessage, Status, describe};

pub(crate) fn message_record(msg: &NodeSpecificMessage, ts: Option<String>) -> MessageRecord {
    MessageRecord {
        ts,
        send_node: msg.send_node(),
        dest_node: msg.dest_node(),
        control_code: msg.control_code(),
        name: describe(msg.control_code()),
        role: role_label(msg).map(str::to_string),
        summary: msg.to_string(),
    }
}

/// Bit Rate Set responses are labelled by outcome; other roles by direction.
fn role_label(msg: &NodeSpecificMessage) -> Option<&'static str> {
    match msg {
        NodeSpecificMessage::BitRateSet(set) => match set.role {
            BitRateRole::Request(_) => Some("request"),
            BitRateRole::Response(Status::Success) => Some("success"),
            BitRateRole::Response(Status::Fail) => Some("failure"),
        },
        other => other.msg_type().map(|kind| kind.as_str()),
    }
}
