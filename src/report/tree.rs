// Tree summarizer - mirrors the suite/spec tree as serializable records

use crate::framework::{Node, RunTree};
use crate::state::{NodeKind, TreeSummary};

/// Summarize one node and everything beneath it.
///
/// Returns `None` for an id the tree does not know.
pub fn summarize(run: &RunTree, node: Node) -> Option<TreeSummary> {
    match node {
        Node::Spec(id) => {
            let spec = run.spec(id)?;
            Some(TreeSummary {
                id: spec.id.0,
                name: spec.description.clone(),
                kind: NodeKind::Spec,
                children: Vec::new(),
            })
        }
        Node::Suite(id) => {
            let suite = run.suite(id)?;
            Some(TreeSummary {
                id: suite.id.0,
                name: suite.description.clone(),
                kind: NodeKind::Suite,
                children: suite
                    .children
                    .iter()
                    .filter_map(|child| summarize(run, *child))
                    .collect(),
            })
        }
    }
}

/// Summaries of every top-level suite, in declaration order
pub fn summarize_run(run: &RunTree) -> Vec<TreeSummary> {
    run.top_level_suites()
        .iter()
        .filter_map(|id| summarize(run, Node::Suite(*id)))
        .collect()
}
