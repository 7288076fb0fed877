// Event reporter - turns framework callbacks into a stream of JSON events

use super::consolidated::{self, ConsolidatedReport};
use super::events;
use super::spec_result::build_spec_result;
use super::summary::{summarize_for_specs, summarize_result};
use super::tree::summarize_run;
use super::Reporter;
use crate::config::{default_name_separator, Config};
use crate::framework::{RunTree, SpecId, SuiteId};
use crate::state::{RunContext, SpecResultRecord, SuiteTiming, TreeSummary};
use crate::time::{elapsed_ms, Clock, SystemClock};
use crate::transport::{to_payload, EventSink, Transport};
use serde_json::json;
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub struct EventReporter<C: Clock = SystemClock> {
    transport: Transport,
    clock: C,
    separator: String,
    ctx: RunContext,
}

impl EventReporter<SystemClock> {
    pub fn new(transport: Transport) -> Self {
        Self::with_clock(transport, SystemClock)
    }

    /// Reporter writing to `sink` with prefix and separator taken from config
    pub fn from_config(config: &Config, sink: Option<Box<dyn EventSink>>) -> Self {
        Self::from_config_with_clock(config, sink, SystemClock)
    }
}

impl<C: Clock> EventReporter<C> {
    pub fn with_clock(transport: Transport, clock: C) -> Self {
        Self {
            transport,
            clock,
            separator: default_name_separator(),
            ctx: RunContext::new(),
        }
    }

    pub fn from_config_with_clock(
        config: &Config,
        sink: Option<Box<dyn EventSink>>,
        clock: C,
    ) -> Self {
        let transport = Transport::new(sink).with_prefix(config.events.prefix.clone());
        Self::with_clock(transport, clock).with_separator(config.report.name_separator.clone())
    }

    /// Separator used when joining ancestor suite names
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn context(&self) -> &RunContext {
        &self.ctx
    }

    /// Tree summaries captured at run start
    pub fn suites(&self) -> &[TreeSummary] {
        self.ctx.suites()
    }

    pub fn results(&self) -> &BTreeMap<SpecId, SpecResultRecord> {
        self.ctx.results()
    }

    pub fn result_for_spec(&self, id: SpecId) -> Option<&SpecResultRecord> {
        self.ctx.result_for_spec(id)
    }

    /// Consolidated report from what has been recorded so far
    pub fn consolidated_report(&self, run: &RunTree) -> ConsolidatedReport {
        consolidated::generate(run, &self.ctx, &self.separator)
    }
}

impl<C: Clock> Reporter for EventReporter<C> {
    fn on_run_start(&mut self, run: &RunTree) {
        self.ctx = RunContext::new();
        self.ctx.start(summarize_run(run));
        if !self.transport.has_sink() {
            debug!("No event sink attached, events will only be traced");
        }
        debug!(
            suites = self.ctx.suites().len(),
            specs = run.specs().len(),
            "Run starting"
        );

        let payload = to_payload(&self.ctx.suites());
        self.transport.emit(events::RUN_STARTING, vec![payload]);
    }

    fn on_spec_start(&mut self, run: &RunTree, spec_id: SpecId) {
        let Some(spec) = run.spec(spec_id) else {
            warn!("Start reported for unknown spec {}", spec_id);
            return;
        };
        if !self.ctx.is_started() {
            warn!("Spec {} started before the run", spec_id);
        }
        self.ctx.mark_spec_started(spec_id, self.clock.now());

        let suite_description = run
            .suite(spec.suite)
            .map(|suite| suite.description.as_str())
            .unwrap_or_default();
        self.transport.emit(
            events::SPEC_STARTING,
            vec![json!({
                "suite": { "description": suite_description },
                "description": spec.description,
            })],
        );
    }

    fn on_spec_end(&mut self, run: &RunTree, spec_id: SpecId) {
        let Some(spec) = run.spec(spec_id) else {
            warn!("Results reported for unknown spec {}", spec_id);
            return;
        };
        if self.ctx.mark_spec_finished(spec_id, self.clock.now()).is_none() {
            warn!("Spec {} finished without being started", spec_id);
        }

        let record = build_spec_result(&spec.results);
        let summary = summarize_result(&record);
        let payloads = vec![to_payload(&spec_id), to_payload(&record), to_payload(&summary)];
        self.ctx.store_result(spec_id, record);

        self.transport.emit(events::SPEC_RESULTS, payloads);
    }

    fn on_suite_end(&mut self, run: &RunTree, suite_id: SuiteId) {
        let Some(suite) = run.suite(suite_id) else {
            warn!("Results reported for unknown suite {}", suite_id);
            return;
        };
        let specs = run.suite_specs(suite_id);
        let Some(first) = specs.first() else {
            return;
        };

        let now = self.clock.now();
        let duration_ms = self
            .ctx
            .spec_timing(first.id)
            .started_at
            .map(|start| elapsed_ms(start, now));
        self.ctx.mark_suite_finished(
            suite_id,
            SuiteTiming {
                timestamp: now,
                duration_ms,
            },
        );

        let counts = run.suite_results(suite_id);
        let skipped = specs.iter().all(|spec| spec.results.skipped);
        self.transport.emit(
            events::SUITE_RESULTS,
            vec![json!({
                "description": suite.description,
                "results": {
                    "totalCount": counts.total_count,
                    "passedCount": counts.passed_count,
                    "failedCount": counts.failed_count,
                    "passed": counts.passed(),
                    "skipped": skipped,
                },
            })],
        );
    }

    fn on_run_end(&mut self, run: &RunTree) {
        self.ctx.finish();

        let summaries = summarize_for_specs(&self.ctx, run.specs().iter().map(|spec| spec.id));
        self.transport
            .emit(events::RUN_RESULTS, vec![to_payload(&summaries)]);

        let report = self.consolidated_report(run);
        debug!(
            tests = report.total_tests(),
            failures = report.total_failures(),
            "Run finished"
        );
        self.transport
            .emit(events::CONSOLIDATED_REPORT, vec![to_payload(&report)]);

        self.transport.emit(events::RUN_DONE, Vec::new());
    }
}
