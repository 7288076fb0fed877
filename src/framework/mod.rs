// Framework module - the suite/spec tree the reporter observes
// The test framework owns this tree; reporters only read it.

pub mod results;

pub use results::{
    ExpectationResult, LogMessage, MessageType, NestedCounts, ResultItem, SpecResults,
};

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuiteId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpecId(pub u64);

impl fmt::Display for SuiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SpecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Child of a suite, tagged at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Suite(SuiteId),
    Spec(SpecId),
}

#[derive(Debug, Clone)]
pub struct SuiteNode {
    pub id: SuiteId,
    pub description: String,
    pub parent: Option<SuiteId>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone)]
pub struct SpecNode {
    pub id: SpecId,
    pub description: String,
    pub suite: SuiteId,
    pub results: SpecResults,
}

/// A whole run: every suite and spec, in declaration order
#[derive(Debug, Clone, Default)]
pub struct RunTree {
    suites: Vec<SuiteNode>,
    specs: Vec<SpecNode>,
    top_level: Vec<SuiteId>,
}

impl RunTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a suite. Returns `None` when `parent` is unknown.
    pub fn add_suite(
        &mut self,
        parent: Option<SuiteId>,
        description: impl Into<String>,
    ) -> Option<SuiteId> {
        let id = SuiteId(self.suites.len() as u64);
        if let Some(parent_id) = parent {
            self.suite_mut(parent_id)?.children.push(Node::Suite(id));
        } else {
            self.top_level.push(id);
        }
        self.suites.push(SuiteNode {
            id,
            description: description.into(),
            parent,
            children: Vec::new(),
        });
        Some(id)
    }

    /// Declare a spec inside `suite`. Returns `None` when the suite is unknown.
    pub fn add_spec(&mut self, suite: SuiteId, description: impl Into<String>) -> Option<SpecId> {
        let id = SpecId(self.specs.len() as u64);
        let description = description.into();
        self.suite_mut(suite)?.children.push(Node::Spec(id));
        self.specs.push(SpecNode {
            id,
            results: SpecResults::new(description.clone()),
            description,
            suite,
        });
        Some(id)
    }

    pub fn top_level_suites(&self) -> &[SuiteId] {
        &self.top_level
    }

    /// All suites, ancestors before descendants
    pub fn suites(&self) -> &[SuiteNode] {
        &self.suites
    }

    pub fn specs(&self) -> &[SpecNode] {
        &self.specs
    }

    pub fn suite(&self, id: SuiteId) -> Option<&SuiteNode> {
        self.suites.get(id.0 as usize)
    }

    pub fn spec(&self, id: SpecId) -> Option<&SpecNode> {
        self.specs.get(id.0 as usize)
    }

    pub fn suite_mut(&mut self, id: SuiteId) -> Option<&mut SuiteNode> {
        self.suites.get_mut(id.0 as usize)
    }

    pub fn spec_mut(&mut self, id: SpecId) -> Option<&mut SpecNode> {
        self.specs.get_mut(id.0 as usize)
    }

    /// Direct specs of a suite, not descendants
    pub fn suite_specs(&self, id: SuiteId) -> Vec<&SpecNode> {
        self.suite(id)
            .map(|suite| {
                suite
                    .children
                    .iter()
                    .filter_map(|child| match child {
                        Node::Spec(spec_id) => self.spec(*spec_id),
                        Node::Suite(_) => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Suite followed by its ancestors, innermost first
    pub fn ancestry(&self, id: SuiteId) -> Vec<&SuiteNode> {
        let mut chain = Vec::new();
        let mut current = self.suite(id);
        while let Some(suite) = current {
            chain.push(suite);
            current = suite.parent.and_then(|parent| self.suite(parent));
        }
        chain
    }

    pub fn top_level_ancestor(&self, id: SuiteId) -> Option<SuiteId> {
        self.ancestry(id).last().map(|suite| suite.id)
    }

    /// Counts over every spec beneath a suite
    pub fn suite_results(&self, id: SuiteId) -> NestedCounts {
        let mut counts = NestedCounts::default();
        let Some(suite) = self.suite(id) else {
            return counts;
        };
        for child in &suite.children {
            match child {
                Node::Spec(spec_id) => {
                    if let Some(spec) = self.spec(*spec_id) {
                        counts.add(&spec.results);
                    }
                }
                Node::Suite(suite_id) => {
                    let nested = self.suite_results(*suite_id);
                    counts.total_count += nested.total_count;
                    counts.passed_count += nested.passed_count;
                    counts.failed_count += nested.failed_count;
                }
            }
        }
        counts
    }
}
