use std::collections::BTreeMap;

use crate::Issue;
use crate::frame::CanFrame;
use crate::protocols::nsm::NsmError;

const MAX_EXAMPLES: usize = 3;

#[derive(Debug, Default)]
pub(crate) struct IssueStats {
    by_id: BTreeMap<&'static str, Entry>,
}

#[derive(Debug)]
struct Entry {
    message: &'static str,
    count: u64,
    examples: Vec<String>,
}

impl IssueStats {
    pub(crate) fn record(&mut self, err: &NsmError, frame: &CanFrame, ts: Option<&str>) {
        let (id, message) = classify(err);
        let entry = self.by_id.entry(id).or_insert_with(|| Entry {
            message,
            count: 0,
            examples: Vec::new(),
        });
        entry.count += 1;
        if entry.examples.len() < MAX_EXAMPLES {
            entry.examples.push(match ts {
                Some(ts) => format!("{frame}: {err} @ {ts}"),
                None => format!("{frame}: {err}"),
            });
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub(crate) fn into_issues(self) -> Vec<Issue> {
        self.by_id
            .into_iter()
            .map(|(id, entry)| Issue {
                id: id.to_string(),
                severity: "error".to_string(),
                message: entry.message.to_string(),
                count: entry.count,
                examples: entry.examples,
            })
            .collect()
    }
}

fn classify(err: &NsmError) -> (&'static str, &'static str) {
    match err {
        NsmError::MsgSize { .. } => (
            "NSM-MSG-SIZE",
            "Payload length matches no layout for the control code",
        ),
        NsmError::FieldRange { .. } => ("NSM-FIELD-RANGE", "Field value outside its legal range"),
        NsmError::TooShort { .. } => ("NSM-EMPTY", "Frame carries no control code"),
        _ => ("NSM-INVALID", "Frame could not be decoded"),
    }
}
