// Serializable spec result records

use crate::framework::MessageType;
use serde::Serialize;

/// Outcome label of a finished spec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Passed,
    Failed,
}

impl Outcome {
    /// Any failed expectation fails the spec
    pub fn from_failed_count(failed_count: usize) -> Self {
        if failed_count > 0 {
            Outcome::Failed
        } else {
            Outcome::Passed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Passed => "passed",
            Outcome::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Trace {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

/// One recorded item with its expectation payloads already stringified
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    pub message_type: MessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matcher_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passed: Option<bool>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<serde_json::Value>,
    /// Present only for failed expectations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Trace>,
}

impl MessageRecord {
    pub fn failed(&self) -> bool {
        self.passed == Some(false)
    }
}

/// Result of one finished spec
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecResultRecord {
    pub description: String,
    pub messages: Vec<MessageRecord>,
    pub failed_count: usize,
    pub total_count: usize,
    pub passed_count: usize,
    pub skipped: bool,
    pub passed: bool,
    pub outcome_label: Outcome,
}

impl SpecResultRecord {
    /// Messages of failed expectations, in recording order
    pub fn failure_messages(&self) -> Vec<String> {
        self.messages
            .iter()
            .filter(|m| m.failed())
            .map(|m| m.message.clone())
            .collect()
    }
}
