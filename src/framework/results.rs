// Raw per-spec results as the test framework records them

use crate::value::{render_text, Value};

/// One check or log line recorded while a spec ran
#[derive(Debug, Clone)]
pub enum ResultItem {
    Expect(ExpectationResult),
    Log(LogMessage),
}

impl ResultItem {
    /// Log lines have no pass/fail capability
    pub fn passed(&self) -> Option<bool> {
        match self {
            ResultItem::Expect(expectation) => Some(expectation.passed),
            ResultItem::Log(_) => None,
        }
    }

    pub fn message_type(&self) -> MessageType {
        match self {
            ResultItem::Expect(_) => MessageType::Expect,
            ResultItem::Log(_) => MessageType::Log,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ResultItem::Expect(expectation) => expectation.message.clone(),
            ResultItem::Log(log) => log.text(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Expect,
    Log,
}

/// Outcome of a single matcher call
#[derive(Debug, Clone, Default)]
pub struct ExpectationResult {
    pub matcher_name: String,
    pub passed: bool,
    pub expected: Value,
    pub actual: Value,
    pub message: String,
    pub stack: Option<String>,
}

impl ExpectationResult {
    pub fn pass(matcher_name: impl Into<String>, expected: Value, actual: Value) -> Self {
        Self {
            matcher_name: matcher_name.into(),
            passed: true,
            expected,
            actual,
            message: "Passed.".to_string(),
            stack: None,
        }
    }

    pub fn fail(
        matcher_name: impl Into<String>,
        expected: Value,
        actual: Value,
        message: impl Into<String>,
    ) -> Self {
        let message = message.into();
        Self {
            matcher_name: matcher_name.into(),
            passed: false,
            expected,
            actual,
            stack: Some(format!("Error: {}", message)),
            message,
        }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

/// A log line: values rendered and joined with single spaces
#[derive(Debug, Clone, Default)]
pub struct LogMessage {
    pub values: Vec<Value>,
}

impl LogMessage {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn text(&self) -> String {
        self.values
            .iter()
            .map(render_text)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Results of one spec
#[derive(Debug, Clone, Default)]
pub struct SpecResults {
    pub description: String,
    pub items: Vec<ResultItem>,
    pub passed_count: usize,
    pub failed_count: usize,
    pub total_count: usize,
    pub skipped: bool,
}

impl SpecResults {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn add_expectation(&mut self, expectation: ExpectationResult) {
        self.total_count += 1;
        if expectation.passed {
            self.passed_count += 1;
        } else {
            self.failed_count += 1;
        }
        self.items.push(ResultItem::Expect(expectation));
    }

    /// Log lines are recorded but not counted
    pub fn add_log(&mut self, values: Vec<Value>) {
        self.items.push(ResultItem::Log(LogMessage::new(values)));
    }

    pub fn passed(&self) -> bool {
        self.passed_count == self.total_count
    }
}

/// Counts aggregated over every spec beneath a suite
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedCounts {
    pub total_count: usize,
    pub passed_count: usize,
    pub failed_count: usize,
}

impl NestedCounts {
    pub fn add(&mut self, results: &SpecResults) {
        self.total_count += results.total_count;
        self.passed_count += results.passed_count;
        self.failed_count += results.failed_count;
    }

    pub fn passed(&self) -> bool {
        self.passed_count == self.total_count
    }
}
