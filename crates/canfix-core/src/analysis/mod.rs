use std::collections::BTreeMap;
use std::path::Path;

use log::{info, warn};
use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::protocols::nsm::envelope::node_for_address;
use crate::protocols::nsm::parse_node_specific;
use crate::source::{CandumpFileSource, FrameEvent, FrameSource, SourceError};
use crate::{CaptureSummary, DEFAULT_GENERATED_AT, Report, make_stub_report};

mod issues;
mod messages;
mod nodes;

use issues::IssueStats;
use messages::message_record;
use nodes::{NodeStats, add_node_frame, build_node_summaries};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

pub fn analyze_candump_file(path: &Path) -> Result<Report, AnalysisError> {
    let source = CandumpFileSource::open(path)?;
    analyze_source(path, source)
}

pub fn analyze_source<S: FrameSource>(
    path: &Path,
    mut source: S,
) -> Result<Report, AnalysisError> {
    let mut frames_total = 0u64;
    let mut node_specific_frames = 0u64;
    let mut first_ts = None;
    let mut last_ts = None;
    let mut messages = Vec::new();
    let mut node_stats: BTreeMap<u8, NodeStats> = BTreeMap::new();
    let mut issue_stats = IssueStats::default();

    while let Some(FrameEvent {
        ts_micros, frame, ..
    }) = source.next_frame()?
    {
        frames_total += 1;
        update_ts_bounds(&mut first_ts, &mut last_ts, ts_micros);
        let Ok(node) = node_for_address(frame.standard_id()) else {
            continue;
        };
        node_specific_frames += 1;
        add_node_frame(&mut node_stats, node, frame.data().first().copied());

        let ts = ts_to_rfc3339(ts_micros);
        match parse_node_specific(&frame) {
            Ok(msg) => messages.push(message_record(&msg, ts)),
            Err(err) => {
                warn!("cannot decode {frame}: {err}");
                issue_stats.record(&err, &frame, ts.as_deref());
            }
        }
    }
    info!(
        "{}: {frames_total} frames, {node_specific_frames} node specific, {} decoded",
        path.display(),
        messages.len()
    );
    if !issue_stats.is_empty() {
        warn!("{}: some node specific frames could not be decoded", path.display());
    }

    let mut report = make_stub_report(&path.display().to_string(), path.metadata()?.len());
    report.capture_summary = Some(CaptureSummary {
        frames_total,
        node_specific_frames,
        time_start: ts_to_rfc3339(first_ts),
        time_end: ts_to_rfc3339(last_ts),
    });
    report.generated_at = report
        .capture_summary
        .as_ref()
        .and_then(|summary| summary.time_end.clone().or(summary.time_start.clone()))
        .unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string());
    report.messages = messages;
    report.nodes = build_node_summaries(node_stats);
    report.issues = issue_stats.into_issues();
    Ok(report)
}

fn update_ts_bounds(first: &mut Option<i64>, last: &mut Option<i64>, ts: Option<i64>) {
    let Some(ts) = ts else {
        return;
    };
    if first.is_none_or(|existing| ts < existing) {
        *first = Some(ts);
    }
    if last.is_none_or(|existing| ts > existing) {
        *last = Some(ts);
    }
}

fn ts_to_rfc3339(ts_micros: Option<i64>) -> Option<String> {
    let nanos = i128::from(ts_micros?) * 1_000;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::{analyze_source, ts_to_rfc3339, update_ts_bounds};
    use crate::source::CandumpSource;

    #[test]
    fn ts_bounds_track_min_and_max() {
        let (mut first, mut last) = (None, None);
        for ts in [Some(5), None, Some(2), Some(9)] {
            update_ts_bounds(&mut first, &mut last, ts);
        }
        assert_eq!(first, Some(2));
        assert_eq!(last, Some(9));
    }

    #[test]
    fn rfc3339_keeps_microseconds() {
        assert_eq!(
            ts_to_rfc3339(Some(1_661_789_611_150_752)).as_deref(),
            Some("2022-08-29T16:13:31.150752Z")
        );
        assert_eq!(ts_to_rfc3339(Some(0)).as_deref(), Some("1970-01-01T00:00:00Z"));
        assert_eq!(ts_to_rfc3339(None), None);
    }

    #[test]
    fn analyze_counts_decodes_and_aggregates() {
        let log = "\
            (1.000000) can0 701#0005\n\
            (2.000000) can0 705#0005010102030200\n\
            (3.000000) can0 123#DEADBEEF\n\
            (4.000000) can0 702#000102\n\
            (5.000000) can0 703#\n";
        let path = std::env::temp_dir().join(format!("canfix-analysis-{}.log", std::process::id()));
        std::fs::write(&path, log).unwrap();

        let source = CandumpSource::new(Cursor::new(log));
        let report = analyze_source(&path, source).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(report.input.bytes, log.len() as u64);
        let summary = report.capture_summary.unwrap();
        assert_eq!(summary.frames_total, 5);
        assert_eq!(summary.node_specific_frames, 4);
        assert_eq!(summary.time_start.as_deref(), Some("1970-01-01T00:00:01Z"));
        assert_eq!(report.generated_at, "1970-01-01T00:00:05Z");

        assert_eq!(report.messages.len(), 2);
        assert_eq!(
            report.messages[1].summary,
            "[5]->[5] Node Identification: device=1, fwrev=2, model=515"
        );
        let nodes: Vec<u8> = report.nodes.iter().map(|n| n.node).collect();
        assert_eq!(nodes, vec![1, 2, 3, 5]);
        assert!(report.nodes[2].control_codes.is_empty());

        let ids: Vec<&str> = report.issues.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["NSM-EMPTY", "NSM-MSG-SIZE"]);
    }
}
