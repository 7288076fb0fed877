// Tests for the event reporter - public API only

use serde_json::{json, Value as Json};
use specrelay::framework::{ExpectationResult, RunTree, SpecId, SuiteId};
use specrelay::report::Reporter;
use specrelay::time::ManualClock;
use specrelay::transport::{MemorySink, Transport};
use specrelay::value::{HostKind, Value};
use specrelay::EventReporter;
use std::rc::Rc;

fn start_clock() -> Rc<ManualClock> {
    let start = chrono::DateTime::parse_from_rfc3339("2024-02-10T10:00:00Z")
        .expect("valid timestamp")
        .with_timezone(&chrono::Utc);
    Rc::new(ManualClock::new(start))
}

/// Math suite: "adds" passes, "subtracts" fails
fn math_run() -> (RunTree, SuiteId, SpecId, SpecId) {
    let mut run = RunTree::new();
    let math = run.add_suite(None, "Math").expect("suite");
    let adds = run.add_spec(math, "adds").expect("spec");
    let subtracts = run.add_spec(math, "subtracts").expect("spec");
    run.spec_mut(adds)
        .expect("spec")
        .results
        .add_expectation(ExpectationResult::pass(
            "toBe",
            Value::Number(2.0),
            Value::Number(2.0),
        ));
    run.spec_mut(subtracts)
        .expect("spec")
        .results
        .add_expectation(ExpectationResult::fail(
            "toBe",
            Value::Number(2.0),
            Value::Number(3.0),
            "expected 2 got 3",
        ));
    (run, math, adds, subtracts)
}

fn drive(run: &RunTree, suite: SuiteId, reporter: &mut impl Reporter, clock: &ManualClock) {
    reporter.on_run_start(run);
    for spec in run.suite_specs(suite) {
        reporter.on_spec_start(run, spec.id);
        clock.advance_ms(100);
        reporter.on_spec_end(run, spec.id);
    }
    reporter.on_suite_end(run, suite);
    reporter.on_run_end(run);
}

fn event<'a>(events: &'a [Vec<Json>], name: &str) -> &'a [Json] {
    events
        .iter()
        .find(|e| e.first().and_then(|n| n.as_str()) == Some(name))
        .map(|e| e.as_slice())
        .unwrap_or_else(|| panic!("no {} event", name))
}

#[test]
fn test_math_scenario_end_to_end() {
    // Arrange
    let (run, math, _, subtracts) = math_run();
    let sink = MemorySink::new();
    let clock = start_clock();
    let mut reporter =
        EventReporter::with_clock(Transport::new(Some(Box::new(sink.clone()))), Rc::clone(&clock));

    // Act
    drive(&run, math, &mut reporter, &clock);

    // Assert
    let record = reporter.result_for_spec(subtracts).expect("stored result");
    assert_eq!(record.failed_count, 1);
    assert_eq!(record.total_count, 1);
    assert!(!record.passed);
    assert_eq!(record.outcome_label.as_str(), "failed");

    let events = sink.events();
    let report = &event(&events, "consolidated-report")[1];
    let suite = &report["suites"][0];
    assert_eq!(suite["name"], "Math");
    assert_eq!(suite["testCount"], 2);
    assert_eq!(suite["failureCount"], 1);
    assert_eq!(suite["time"], 0.2);
    assert_eq!(suite["timestamp"], "2024-02-10T10:00:00.200Z");
    let failing: Vec<&Json> = suite["testcases"]
        .as_array()
        .expect("testcases")
        .iter()
        .filter(|t| !t["failureMessages"].as_array().expect("list").is_empty())
        .collect();
    assert_eq!(failing.len(), 1);
    assert_eq!(failing[0]["failureMessages"], json!(["expected 2 got 3"]));
    assert_eq!(report["consolidatedSuites"]["0"][0]["name"], "Math");
}

#[test]
fn test_outcome_label_matches_failed_count() {
    // Arrange
    let (run, math, _, _) = math_run();
    let clock = start_clock();
    let mut reporter = EventReporter::with_clock(Transport::default(), Rc::clone(&clock));

    // Act
    drive(&run, math, &mut reporter, &clock);

    // Assert
    for record in reporter.results().values() {
        assert_eq!(record.failed_count > 0, record.outcome_label.as_str() == "failed");
        assert!(record.passed_count + record.failed_count <= record.total_count);
    }
}

#[test]
fn test_run_starting_carries_tree() {
    // Arrange
    let (run, _, _, _) = math_run();
    let sink = MemorySink::new();
    let mut reporter = EventReporter::new(Transport::new(Some(Box::new(sink.clone()))));

    // Act
    reporter.on_run_start(&run);

    // Assert
    let events = sink.events();
    assert_eq!(
        event(&events, "run-starting")[1],
        json!([{
            "id": 0, "name": "Math", "kind": "suite",
            "children": [
                {"id": 0, "name": "adds", "kind": "spec", "children": []},
                {"id": 1, "name": "subtracts", "kind": "spec", "children": []}
            ]
        }])
    );
    assert_eq!(reporter.suites().len(), 1);
}

#[test]
fn test_spec_starting_payload() {
    // Arrange
    let (run, _, adds, _) = math_run();
    let sink = MemorySink::new();
    let mut reporter = EventReporter::new(Transport::new(Some(Box::new(sink.clone()))));

    // Act
    reporter.on_run_start(&run);
    reporter.on_spec_start(&run, adds);

    // Assert
    let events = sink.events();
    assert_eq!(
        event(&events, "spec-starting")[1],
        json!({"suite": {"description": "Math"}, "description": "adds"})
    );
}

#[test]
fn test_run_results_and_done_sentinel() {
    // Arrange
    let (run, math, adds, subtracts) = math_run();
    let sink = MemorySink::new();
    let clock = start_clock();
    let mut reporter =
        EventReporter::with_clock(Transport::new(Some(Box::new(sink.clone()))), Rc::clone(&clock));

    // Act
    drive(&run, math, &mut reporter, &clock);

    // Assert
    let events = sink.events();
    let summaries = &event(&events, "run-results")[1];
    assert_eq!(summaries[adds.to_string()]["result"], "passed");
    assert_eq!(summaries[subtracts.to_string()]["messages"][0]["passed"], false);
    assert_eq!(events.last().expect("events"), &vec![json!("run-done")]);
    assert!(reporter.context().is_finished());
}

#[test]
fn test_cyclic_and_host_payloads_survive_transport() {
    // Arrange
    let mut run = RunTree::new();
    let suite = run.add_suite(None, "DOM").expect("suite");
    let spec = run.add_spec(suite, "renders").expect("spec");
    let element = Value::object([
        ("tag", Value::string("div")),
        ("node", Value::Host(HostKind::Node)),
        ("window", Value::Host(HostKind::Window)),
        ("onclick", Value::function("handler")),
    ]);
    element.set("self", element.clone());
    run.spec_mut(spec)
        .expect("spec")
        .results
        .add_expectation(ExpectationResult::fail(
            "toEqual",
            Value::Null,
            element,
            "mismatch",
        ));
    let sink = MemorySink::new();
    let mut reporter = EventReporter::new(Transport::new(Some(Box::new(sink.clone()))));

    // Act
    reporter.on_run_start(&run);
    reporter.on_spec_start(&run, spec);
    reporter.on_spec_end(&run, spec);

    // Assert
    let events = sink.events();
    let record = &event(&events, "spec-results")[2];
    assert_eq!(
        record["messages"][0]["actual"],
        r#"{"tag":"div","node":"[ Node ]","window":"[ Window ]","onclick":"[ Function ]","self":"[ Circular {root} ]"}"#
    );
    assert_eq!(record["messages"][0]["expected"], Json::Null);
}

#[test]
fn test_prefix_from_config() {
    // Arrange
    let (run, _, _, _) = math_run();
    let sink = MemorySink::new();
    let mut config = specrelay::config::Config::default();
    config.events.prefix = "jasmine.".to_string();
    let mut reporter = EventReporter::from_config(&config, Some(Box::new(sink.clone())));

    // Act
    reporter.on_run_start(&run);

    // Assert
    assert!(sink.messages()[0].starts_with(r#"["jasmine.run-starting","#));
}

#[test]
fn test_without_sink_results_still_recorded() {
    // Arrange
    let (run, math, _, subtracts) = math_run();
    let clock = start_clock();
    let mut reporter = EventReporter::with_clock(Transport::new(None), Rc::clone(&clock));

    // Act
    drive(&run, math, &mut reporter, &clock);

    // Assert
    assert_eq!(reporter.results().len(), 2);
    let report = reporter.consolidated_report(&run);
    assert_eq!(report.suites[0].testcases[1].failure_messages, vec!["expected 2 got 3"]);
    assert!(reporter.result_for_spec(subtracts).is_some());
}
