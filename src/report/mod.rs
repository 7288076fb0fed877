// Report module - framework callbacks and the builders behind them

pub mod consolidated;
pub mod event_reporter;
pub mod spec_result;
pub mod summary;
pub mod tree;

use crate::framework::{RunTree, SpecId, SuiteId};
pub use consolidated::{ConsolidatedReport, SuiteReportRecord, TestCaseRecord};
pub use event_reporter::EventReporter;
pub use spec_result::build_spec_result;
pub use summary::{summarize_for_specs, SummaryMessage, SummaryRecord};
pub use tree::{summarize, summarize_run};

/// Event names on the wire
pub mod events {
    pub const RUN_STARTING: &str = "run-starting";
    pub const SPEC_STARTING: &str = "spec-starting";
    pub const SPEC_RESULTS: &str = "spec-results";
    pub const SUITE_RESULTS: &str = "suite-results";
    pub const RUN_RESULTS: &str = "run-results";
    pub const CONSOLIDATED_REPORT: &str = "consolidated-report";
    pub const RUN_DONE: &str = "run-done";
}

/// Reporter trait
///
/// The framework calls these in order: run start, then for each spec a start
/// and an end, suite ends as suites complete, and finally run end. Calls never
/// overlap.
pub trait Reporter {
    /// Called once before any spec runs
    fn on_run_start(&mut self, run: &RunTree);

    /// Called when a spec starts
    fn on_spec_start(&mut self, run: &RunTree, spec: SpecId);

    /// Called when a spec finishes and its results are final
    fn on_spec_end(&mut self, run: &RunTree, spec: SpecId);

    /// Called when a suite and all its children finish
    fn on_suite_end(&mut self, run: &RunTree, suite: SuiteId);

    /// Called once after everything ran
    fn on_run_end(&mut self, run: &RunTree);
}
