// Structural summary of the suite/spec tree

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Suite,
    Spec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeSummary {
    pub id: u64,
    pub name: String,
    pub kind: NodeKind,
    pub children: Vec<TreeSummary>,
}

impl TreeSummary {
    /// Number of nodes including this one
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeSummary::node_count).sum::<usize>()
    }

    /// Levels below and including this node
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(TreeSummary::depth).max().unwrap_or(0)
    }
}
