// Consolidated report builder - end-of-run summary grouped by top-level suite
//
// Records are shaped after JUnit's testsuite/testcase elements so a downstream
// writer can translate them directly.

use crate::framework::{RunTree, SpecNode, SuiteId, SuiteNode};
use crate::state::RunContext;
use crate::time::to_iso8601;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseRecord {
    pub assertion_count: usize,
    pub class_name: String,
    pub name: String,
    /// Seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
    pub failure_messages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteReportRecord {
    pub name: String,
    /// Seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub test_count: usize,
    pub error_count: usize,
    pub testcases: Vec<TestCaseRecord>,
    pub failure_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedReport {
    pub suites: Vec<SuiteReportRecord>,
    pub consolidated_suites: BTreeMap<SuiteId, Vec<SuiteReportRecord>>,
}

impl ConsolidatedReport {
    pub fn total_tests(&self) -> usize {
        self.suites.iter().map(|s| s.test_count).sum()
    }

    pub fn total_failures(&self) -> usize {
        self.suites.iter().map(|s| s.failure_count).sum()
    }
}

/// Build the consolidated report for a finished run
pub fn generate(run: &RunTree, ctx: &RunContext, separator: &str) -> ConsolidatedReport {
    let mut report = ConsolidatedReport::default();

    for suite in run.suites() {
        let data = suite_record(run, ctx, suite, separator);

        match suite.parent {
            None => {
                report.consolidated_suites.insert(suite.id, vec![data.clone()]);
            }
            Some(_) => {
                let top = run.top_level_ancestor(suite.id).unwrap_or(suite.id);
                let group = report.consolidated_suites.entry(top).or_insert_with(|| {
                    warn!("Suite {} reported before its top-level suite {}", suite.id, top);
                    Vec::new()
                });
                group.push(data.clone());
            }
        }

        report.suites.push(data);
    }

    report
}

/// Suite description prefixed by every ancestor's, root first
pub fn nested_suite_name(run: &RunTree, id: SuiteId, separator: &str) -> String {
    let mut names: Vec<&str> = run
        .ancestry(id)
        .iter()
        .map(|suite| suite.description.as_str())
        .collect();
    names.reverse();
    names.join(separator)
}

fn suite_record(
    run: &RunTree,
    ctx: &RunContext,
    suite: &SuiteNode,
    separator: &str,
) -> SuiteReportRecord {
    let specs = run.suite_specs(suite.id);
    let mut failures = 0;
    let testcases = specs
        .iter()
        .map(|spec| {
            let testcase = testcase_record(run, ctx, spec, separator);
            if ctx
                .result_for_spec(spec.id)
                .is_some_and(|r| r.failed_count > 0)
            {
                failures += 1;
            }
            testcase
        })
        .collect();

    let timing = ctx.suite_timing(suite.id);

    SuiteReportRecord {
        name: nested_suite_name(run, suite.id, separator),
        time: timing.and_then(|t| t.duration_ms).map(ms_to_seconds),
        timestamp: timing.map(|t| to_iso8601(t.timestamp)),
        test_count: specs.len(),
        error_count: 0,
        testcases,
        failure_count: failures,
    }
}

fn testcase_record(
    run: &RunTree,
    ctx: &RunContext,
    spec: &SpecNode,
    separator: &str,
) -> TestCaseRecord {
    let record = ctx.result_for_spec(spec.id);
    if record.is_none() {
        warn!("Spec {} finished without a recorded result", spec.id);
    }

    TestCaseRecord {
        assertion_count: record.map(|r| r.messages.len()).unwrap_or(0),
        class_name: nested_suite_name(run, spec.suite, separator),
        name: spec.description.clone(),
        time: ctx.spec_timing(spec.id).duration_ms.map(ms_to_seconds),
        failure_messages: record
            .filter(|r| r.failed_count > 0)
            .map(|r| r.failure_messages())
            .unwrap_or_default(),
    }
}

fn ms_to_seconds(ms: u64) -> f64 {
    ms as f64 / 1000.0
}
