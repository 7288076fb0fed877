// Run summary builder - compact per-spec view used in run-end broadcasts

use crate::framework::{MessageType, SpecId};
use crate::state::{MessageRecord, Outcome, RunContext, SpecResultRecord, Trace};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMessage {
    /// Only log lines carry text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub passed: bool,
    pub message_type: MessageType,
    pub message: String,
    pub trace: Trace,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRecord {
    pub result: Outcome,
    pub messages: Vec<SummaryMessage>,
}

/// Summaries keyed by spec id. Ids with no stored result map to `None`.
pub fn summarize_for_specs(
    ctx: &RunContext,
    ids: impl IntoIterator<Item = SpecId>,
) -> BTreeMap<SpecId, Option<SummaryRecord>> {
    ids.into_iter()
        .map(|id| {
            let summary = ctx.result_for_spec(id).map(summarize_result);
            if summary.is_none() {
                warn!("No result recorded for spec {}", id);
            }
            (id, summary)
        })
        .collect()
}

pub fn summarize_result(record: &SpecResultRecord) -> SummaryRecord {
    SummaryRecord {
        result: record.outcome_label,
        messages: record.messages.iter().map(summarize_message).collect(),
    }
}

fn summarize_message(message: &MessageRecord) -> SummaryMessage {
    let failed = message.failed();
    SummaryMessage {
        text: (message.message_type == MessageType::Log).then(|| message.message.clone()),
        passed: message.passed.unwrap_or(true),
        message_type: message.message_type,
        message: message.message.clone(),
        trace: Trace {
            stack: if failed {
                message.trace.as_ref().and_then(|t| t.stack.clone())
            } else {
                None
            },
        },
    }
}
