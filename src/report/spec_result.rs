// Spec result builder - raw framework results to a serializable record

use crate::framework::{ResultItem, SpecResults};
use crate::state::{MessageRecord, Outcome, SpecResultRecord, Trace};
use crate::value::stringify;

/// Build the record for a finished spec.
///
/// Expected/actual payloads go through the safe stringifier so the record can
/// always be serialized, whatever the spec compared.
pub fn build_spec_result(results: &SpecResults) -> SpecResultRecord {
    SpecResultRecord {
        description: results.description.clone(),
        messages: results.items.iter().map(message_record).collect(),
        failed_count: results.failed_count,
        total_count: results.total_count,
        passed_count: results.passed_count,
        skipped: results.skipped,
        passed: results.passed(),
        outcome_label: Outcome::from_failed_count(results.failed_count),
    }
}

fn message_record(item: &ResultItem) -> MessageRecord {
    match item {
        ResultItem::Expect(expectation) => MessageRecord {
            message_type: item.message_type(),
            matcher_name: Some(expectation.matcher_name.clone()),
            passed: Some(expectation.passed),
            message: expectation.message.clone(),
            expected: stringify(&expectation.expected),
            actual: stringify(&expectation.actual),
            trace: (!expectation.passed).then(|| Trace {
                stack: expectation.stack.clone(),
            }),
        },
        ResultItem::Log(_) => MessageRecord {
            message_type: item.message_type(),
            matcher_name: None,
            passed: None,
            message: item.message(),
            expected: None,
            actual: None,
            trace: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::{ExpectationResult, MessageType};
    use crate::value::Value;
    use serde_json::json;

    #[test]
    fn test_failed_spec_record() {
        let mut results = SpecResults::new("subtracts");
        results.add_expectation(ExpectationResult::fail(
            "toEqual",
            Value::Number(2.0),
            Value::Number(3.0),
            "expected 2 got 3",
        ));

        let record = build_spec_result(&results);

        assert_eq!(record.failed_count, 1);
        assert_eq!(record.total_count, 1);
        assert_eq!(record.passed_count, 0);
        assert!(!record.passed);
        assert_eq!(record.outcome_label, Outcome::Failed);
        let message = &record.messages[0];
        assert_eq!(message.expected, Some(json!(2)));
        assert_eq!(message.actual, Some(json!(3)));
        assert_eq!(
            message.trace.as_ref().and_then(|t| t.stack.as_deref()),
            Some("Error: expected 2 got 3")
        );
    }

    #[test]
    fn test_passing_expectation_has_no_trace() {
        let mut results = SpecResults::new("adds");
        results.add_expectation(
            ExpectationResult::pass("toBe", Value::Number(2.0), Value::Number(2.0))
                .with_stack("irrelevant"),
        );

        let record = build_spec_result(&results);

        assert_eq!(record.outcome_label, Outcome::Passed);
        assert!(record.messages[0].trace.is_none());
        let json = serde_json::to_value(&record.messages[0]).unwrap();
        assert!(json.get("trace").is_none());
    }

    #[test]
    fn test_cyclic_payload_is_stringified() {
        let actual = Value::object([("name", Value::string("loop"))]);
        actual.set("me", actual.clone());
        let mut results = SpecResults::new("cycles");
        results.add_expectation(ExpectationResult::fail(
            "toEqual",
            Value::object([("name", Value::string("loop"))]),
            actual,
            "not equal",
        ));

        let record = build_spec_result(&results);

        assert_eq!(
            record.messages[0].actual,
            Some(json!(r#"{"name":"loop","me":"[ Circular {root} ]"}"#))
        );
        assert!(serde_json::to_string(&record).is_ok());
    }

    #[test]
    fn test_falsy_payloads_kept() {
        let mut results = SpecResults::new("zero");
        results.add_expectation(ExpectationResult::pass(
            "toBe",
            Value::Number(0.0),
            Value::Undefined,
        ));

        let record = build_spec_result(&results);

        assert_eq!(record.messages[0].expected, Some(json!(0)));
        assert_eq!(record.messages[0].actual, None);
    }

    #[test]
    fn test_log_items_carry_text() {
        let mut results = SpecResults::new("logs");
        results.add_log(vec![Value::string("value is"), Value::Number(4.0)]);

        let record = build_spec_result(&results);

        let message = &record.messages[0];
        assert_eq!(message.message_type, MessageType::Log);
        assert_eq!(message.message, "value is 4");
        assert_eq!(message.passed, None);
        assert_eq!(record.total_count, 0);
        assert_eq!(record.outcome_label, Outcome::Passed);
    }

    #[test]
    fn test_skipped_flag_carried() {
        let mut results = SpecResults::new("later");
        results.skipped = true;

        assert!(build_spec_result(&results).skipped);
    }
}
