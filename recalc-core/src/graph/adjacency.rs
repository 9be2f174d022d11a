//! Dependency Adjacency
//!
//! Forward (`dependencies`) and reverse (`dependents`) edges discovered while
//! evaluating. Both directions are updated together, so `dependents` is
//! always the exact transpose of `dependencies`.
//!
//! Edges are only ever added. Once a node has been observed to read another,
//! the edge survives invalidation for the lifetime of the graph instance, so
//! a node with branching control flow records the union of every branch it
//! has taken.

use indexmap::IndexSet;

use super::node::NodeId;

/// Forward and reverse adjacency indexed by node id.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// `dependencies[n]`: nodes `n` has been observed to need.
    dependencies: Vec<IndexSet<NodeId>>,

    /// `dependents[n]`: nodes observed to need `n`.
    dependents: Vec<IndexSet<NodeId>>,
}

impl DependencyGraph {
    /// Create an edgeless graph over `node_count` nodes.
    pub fn new(node_count: usize) -> Self {
        Self {
            dependencies: vec![IndexSet::new(); node_count],
            dependents: vec![IndexSet::new(); node_count],
        }
    }

    /// Record that `dependent` needs `dependency`.
    ///
    /// Returns `true` if the edge is new.
    pub fn add_edge(&mut self, dependency: NodeId, dependent: NodeId) -> bool {
        let added = self.dependencies[dependent.index()].insert(dependency);
        self.dependents[dependency.index()].insert(dependent);
        added
    }

    /// Nodes `id` has been observed to need.
    pub fn dependencies(&self, id: NodeId) -> &IndexSet<NodeId> {
        &self.dependencies[id.index()]
    }

    /// Nodes observed to need `id`.
    pub fn dependents(&self, id: NodeId) -> &IndexSet<NodeId> {
        &self.dependents[id.index()]
    }

    /// Number of nodes covered.
    pub fn node_count(&self) -> usize {
        self.dependencies.len()
    }

    /// Total number of recorded edges.
    pub fn edge_count(&self) -> usize {
        self.dependencies.iter().map(IndexSet::len).sum()
    }
}
