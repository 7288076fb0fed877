// State module - run-scoped reporter state
//
// A RunContext is created at run start, filled in as specs and suites finish,
// read by the run-end builders, and dropped once the run is reported.

pub mod result;
pub mod tree;

pub use result::{MessageRecord, Outcome, SpecResultRecord, Trace};
pub use tree::{NodeKind, TreeSummary};

use crate::framework::{SpecId, SuiteId};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpecTiming {
    pub started_at: Option<DateTime<Utc>>,
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuiteTiming {
    pub timestamp: DateTime<Utc>,
    pub duration_ms: Option<u64>,
}

/// Everything the reporter learns during one run
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    started: bool,
    finished: bool,
    suites: Vec<TreeSummary>,
    results: BTreeMap<SpecId, SpecResultRecord>,
    spec_timing: HashMap<SpecId, SpecTiming>,
    suite_timing: HashMap<SuiteId, SuiteTiming>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the run started and cache the tree summaries
    pub fn start(&mut self, suites: Vec<TreeSummary>) {
        self.started = true;
        self.suites = suites;
    }

    pub fn finish(&mut self) {
        self.finished = true;
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Tree summaries of every top-level suite
    pub fn suites(&self) -> &[TreeSummary] {
        &self.suites
    }

    pub fn results(&self) -> &BTreeMap<SpecId, SpecResultRecord> {
        &self.results
    }

    pub fn result_for_spec(&self, id: SpecId) -> Option<&SpecResultRecord> {
        self.results.get(&id)
    }

    /// Store a spec result. A second write for the same spec replaces the first.
    pub fn store_result(&mut self, id: SpecId, record: SpecResultRecord) {
        if self.results.insert(id, record).is_some() {
            debug!("Replaced stored result for spec {}", id);
        }
    }

    pub fn mark_spec_started(&mut self, id: SpecId, at: DateTime<Utc>) {
        self.spec_timing.entry(id).or_default().started_at = Some(at);
    }

    /// Record the spec's duration. `None` when it was never started.
    pub fn mark_spec_finished(&mut self, id: SpecId, at: DateTime<Utc>) -> Option<u64> {
        let timing = self.spec_timing.entry(id).or_default();
        let duration = timing
            .started_at
            .map(|start| crate::time::elapsed_ms(start, at));
        timing.duration_ms = duration;
        duration
    }

    pub fn spec_timing(&self, id: SpecId) -> SpecTiming {
        self.spec_timing.get(&id).copied().unwrap_or_default()
    }

    pub fn mark_suite_finished(&mut self, id: SuiteId, timing: SuiteTiming) {
        self.suite_timing.insert(id, timing);
    }

    pub fn suite_timing(&self, id: SuiteId) -> Option<SuiteTiming> {
        self.suite_timing.get(&id).copied()
    }
}
