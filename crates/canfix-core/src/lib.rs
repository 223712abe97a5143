//! CAN-FIX core library: Node Specific Message codec and log analysis.
//!
//! The codec turns classic CAN frames in the node specific range
//! (`0x700..=0x7FF`) into typed, validated messages and back. Which variant
//! and which role (request, response, success, failure) a frame carries is
//! decided once, from the control code, the frame length and sentinel
//! bytes, and recorded in the value's type. Codecs are byte-oriented and
//! side-effect free; all I/O is isolated in `source` modules, and the
//! `analysis` layer drives the codec over a candump log to build a
//! deterministic report.
//!
//! Invariants:
//! - `decode(encode(m)) == m` for every constructible message.
//! - Field ranges are checked at construction; nothing invalid is encoded.
//! - Report outputs are deterministic and stable across runs.
//!
//! # Examples
//! ```
//! use canfix_core::{BitRate, BitRateSet, CanFrame, NodeSpecificCodec, parse_node_specific};
//!
//! let request = BitRateSet::request(1, 5, BitRate::new(500)?);
//! let frame = request.encode()?;
//! assert_eq!(frame, CanFrame::new(0x701, &[0x01, 0x05, 0x03])?);
//! assert_eq!(
//!     parse_node_specific(&frame)?.to_string(),
//!     "[1]->[5] Bit Rate Set: request bitrate=500kbps"
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

mod analysis;
mod frame;
#[doc(hidden)]
pub mod golden;
pub mod protocols;
pub mod source;

pub use analysis::{AnalysisError, analyze_candump_file, analyze_source};
pub use frame::{CanFrame, FrameError, MAX_DLC};
pub use protocols::nsm::{
    BitRate, BitRateRole, BitRateSet, ControlCodeClass, DeviceInfo, Identification, MsgType,
    NodeIdRole, NodeIdSet, NodeIdentification, NodeSpecific, NodeSpecificCodec,
    NodeSpecificMessage, NsmError, Status, describe, parse_envelope, parse_node_specific,
};
pub use source::{
    CandumpFileSource, CandumpSource, FrameEvent, FrameSource, SourceError, parse_frame_text,
};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when no capture time is available.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Decoded log report with deterministic ordering.
///
/// # Examples
/// ```
/// use canfix_core::make_stub_report;
///
/// let report = make_stub_report("bus.log", 123);
/// assert_eq!(report.report_version, canfix_core::REPORT_VERSION);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// RFC3339 timestamp representing the report generation time.
    pub generated_at: String,

    /// Input log metadata.
    pub input: InputInfo,

    /// Optional capture summary (may be empty when unavailable).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_summary: Option<CaptureSummary>,
    /// Decoded node specific messages in log order.
    pub messages: Vec<MessageRecord>,
    /// Per sending node summaries, ordered by node number.
    pub nodes: Vec<NodeSummary>,
    /// Decode failures aggregated by issue id.
    pub issues: Vec<Issue>,
}

/// Tool metadata embedded in reports.
///
/// # Examples
/// ```
/// use canfix_core::ToolInfo;
///
/// let tool = ToolInfo {
///     name: "canfix".to_string(),
///     version: "0.1.0".to_string(),
/// };
/// assert_eq!(tool.name, "canfix");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name (e.g., "canfix").
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Input log metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the analyzer.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Basic capture summary (timestamps may be absent).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureSummary {
    /// Classic frames read from the log.
    pub frames_total: u64,
    /// Frames whose identifier falls in the node specific range.
    pub node_specific_frames: u64,
    /// RFC3339 timestamp of the earliest frame (if known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    /// RFC3339 timestamp of the latest frame (if known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
}

/// One successfully decoded message.
///
/// # Examples
/// ```
/// use canfix_core::MessageRecord;
///
/// let record = MessageRecord {
///     ts: None,
///     send_node: 1,
///     dest_node: Some(5),
///     control_code: 0,
///     name: "Node Identification".to_string(),
///     role: Some("request".to_string()),
///     summary: "[1]->[5] Node Identification: request".to_string(),
/// };
/// assert_eq!(record.dest_node, Some(5));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRecord {
    /// RFC3339 capture time, when logged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts: Option<String>,
    pub send_node: u8,
    /// Addressee; absent for control codes without a dedicated codec.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dest_node: Option<u8>,
    pub control_code: u8,
    /// Control code name from the registry.
    pub name: String,
    /// `request`, `response`, `success` or `failure`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// One-line human readable summary.
    pub summary: String,
}

/// Traffic sent by one node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSummary {
    pub node: u8,
    /// Node specific frames sent, decodable or not.
    pub frames: u64,
    /// Distinct control codes seen from this node, ascending.
    pub control_codes: Vec<u8>,
}

/// Aggregated decode failure.
///
/// # Examples
/// ```
/// use canfix_core::Issue;
///
/// let issue = Issue {
///     id: "NSM-MSG-SIZE".to_string(),
///     severity: "error".to_string(),
///     message: "Payload length matches no layout for the control code".to_string(),
///     count: 1,
///     examples: vec!["702#0205".to_string()],
/// };
/// assert_eq!(issue.count, 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Stable issue identifier (e.g., `NSM-FIELD-RANGE`).
    pub id: String,
    /// Severity label (`error` or `warning`).
    pub severity: String,
    /// Human-readable message explaining the issue.
    pub message: String,
    /// Number of occurrences aggregated into this issue.
    pub count: u64,
    /// At most three example contexts, formatted as `frame: error @ ts`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
}

/// Build a stub report with base fields filled and empty aggregates.
///
/// # Examples
/// ```
/// use canfix_core::make_stub_report;
///
/// let report = make_stub_report("bus.log", 123);
/// assert_eq!(report.input.bytes, 123);
/// assert!(report.messages.is_empty());
/// ```
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "canfix".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        capture_summary: None,
        messages: vec![],
        nodes: vec![],
        issues: vec![],
    }
}
