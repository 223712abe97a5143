use std::collections::{BTreeMap, BTreeSet};

use crate::NodeSummary;

#[derive(Debug, Default, Clone)]
pub(crate) struct NodeStats {
    pub frames: u64,
    pub control_codes: BTreeSet<u8>,
}

/// Count one node specific frame; `control_code` is absent for empty frames.
pub(crate) fn add_node_frame(
    stats: &mut BTreeMap<u8, NodeStats>,
    node: u8,
    control_code: Option<u8>,
) {
    let entry = stats.entry(node).or_default();
    entry.frames += 1;
    if let Some(code) = control_code {
        entry.control_codes.insert(code);
    }
}

pub(crate) fn build_node_summaries(stats: BTreeMap<u8, NodeStats>) -> Vec<NodeSummary> {
    stats
        .into_iter()
        .map(|(node, stats)| NodeSummary {
            node,
            frames: stats.frames,
            control_codes: stats.control_codes.into_iter().collect(),
        })
        .collect()
}
