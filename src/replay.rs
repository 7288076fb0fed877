// Replay driver - feeds a recorded run through a reporter in framework order
//
// A fixture is a JSON description of suites, specs and their recorded items.
// Specs report start then end, a suite reports after all of its children, and
// the run reports last. Time comes from a manual clock advanced by each spec's
// recorded duration, so replays are deterministic.

use crate::error::{Error, Result};
use crate::framework::{ExpectationResult, Node, RunTree, SpecId, SuiteId};
use crate::report::Reporter;
use crate::time::ManualClock;
use crate::value::{render_text, Value};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub suites: Vec<FixtureSuite>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureSuite {
    pub description: String,
    #[serde(default)]
    pub children: Vec<FixtureNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixtureNode {
    Suite(FixtureSuite),
    Spec(FixtureSpec),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureSpec {
    pub description: String,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub skipped: bool,
    #[serde(default)]
    pub items: Vec<FixtureItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixtureItem {
    Expect(FixtureExpectation),
    Log(Vec<serde_json::Value>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureExpectation {
    #[serde(default)]
    pub matcher: String,
    pub passed: bool,
    /// Missing means undefined; an explicit null stays null
    #[serde(default, deserialize_with = "present")]
    pub expected: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "present")]
    pub actual: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub stack: Option<String>,
}

fn present<'de, D>(deserializer: D) -> std::result::Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

impl Fixture {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

impl FixtureExpectation {
    fn to_result(&self) -> ExpectationResult {
        let expected = self.expected.clone().map(Value::from).unwrap_or_default();
        let actual = self.actual.clone().map(Value::from).unwrap_or_default();

        if self.passed {
            let mut result = ExpectationResult::pass(self.matcher.clone(), expected, actual);
            if let Some(message) = &self.message {
                result.message = message.clone();
            }
            return result;
        }

        let message = self.message.clone().unwrap_or_else(|| {
            format!(
                "Expected {} {} {}.",
                render_text(&actual),
                self.matcher,
                render_text(&expected)
            )
        });
        let result = ExpectationResult::fail(self.matcher.clone(), expected, actual, message);
        match &self.stack {
            Some(stack) => result.with_stack(stack.clone()),
            None => result,
        }
    }
}

/// A run tree built from a fixture, ready to be replayed
#[derive(Debug, Clone)]
pub struct Replay {
    pub run: RunTree,
    durations: HashMap<SpecId, u64>,
}

impl Replay {
    pub fn from_fixture(fixture: &Fixture) -> Result<Self> {
        let mut replay = Self {
            run: RunTree::new(),
            durations: HashMap::new(),
        };
        for suite in &fixture.suites {
            replay.add_suite(None, suite)?;
        }
        debug!(
            suites = replay.run.suites().len(),
            specs = replay.run.specs().len(),
            "Fixture loaded"
        );
        Ok(replay)
    }

    fn add_suite(&mut self, parent: Option<SuiteId>, suite: &FixtureSuite) -> Result<()> {
        let id = self
            .run
            .add_suite(parent, suite.description.clone())
            .ok_or_else(|| Error::Fixture(format!("no parent for suite '{}'", suite.description)))?;

        for child in &suite.children {
            match child {
                FixtureNode::Suite(nested) => self.add_suite(Some(id), nested)?,
                FixtureNode::Spec(spec) => self.add_spec(id, spec)?,
            }
        }
        Ok(())
    }

    fn add_spec(&mut self, suite: SuiteId, spec: &FixtureSpec) -> Result<()> {
        let id = self
            .run
            .add_spec(suite, spec.description.clone())
            .ok_or_else(|| Error::Fixture(format!("no suite for spec '{}'", spec.description)))?;
        self.durations.insert(id, spec.duration_ms);

        let Some(node) = self.run.spec_mut(id) else {
            return Err(Error::Fixture(format!("spec '{}' vanished", spec.description)));
        };
        node.results.skipped = spec.skipped;
        for item in &spec.items {
            match item {
                FixtureItem::Expect(expectation) => {
                    node.results.add_expectation(expectation.to_result())
                }
                FixtureItem::Log(values) => node
                    .results
                    .add_log(values.iter().cloned().map(Value::from).collect()),
            }
        }
        Ok(())
    }

    /// Drive `reporter` through the whole run
    pub fn drive<R: Reporter>(&self, reporter: &mut R, clock: &ManualClock) {
        reporter.on_run_start(&self.run);
        for suite in self.run.top_level_suites() {
            self.visit(*suite, reporter, clock);
        }
        reporter.on_run_end(&self.run);
    }

    fn visit<R: Reporter>(&self, suite_id: SuiteId, reporter: &mut R, clock: &ManualClock) {
        let Some(suite) = self.run.suite(suite_id) else {
            return;
        };
        for child in &suite.children {
            match *child {
                Node::Spec(spec) => {
                    reporter.on_spec_start(&self.run, spec);
                    clock.advance_ms(self.durations.get(&spec).copied().unwrap_or(0));
                    reporter.on_spec_end(&self.run, spec);
                }
                Node::Suite(nested) => self.visit(nested, reporter, clock),
            }
        }
        reporter.on_suite_end(&self.run, suite_id);
    }
}
