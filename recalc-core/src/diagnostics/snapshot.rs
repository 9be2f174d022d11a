//! Adjacency Snapshots
//!
//! A [`DependencySnapshot`] is a detached, name-keyed copy of a graph's
//! adjacency. It is what diagnostics consume; it never refers back to the
//! live graph, so it can be serialized, stored or built by hand.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Name → set of names, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencySnapshot {
    nodes: IndexMap<String, IndexSet<String>>,
}

impl DependencySnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node with its edges. Edges merge with any already present.
    pub fn insert<I, D>(&mut self, node: impl Into<String>, edges: I)
    where
        I: IntoIterator<Item = D>,
        D: Into<String>,
    {
        self.nodes
            .entry(node.into())
            .or_default()
            .extend(edges.into_iter().map(Into::<String>::into));
    }

    /// Edges recorded for `node`, if it is present.
    pub fn dependencies_of(&self, node: &str) -> Option<&IndexSet<String>> {
        self.nodes.get(node)
    }

    /// Check whether `node` has an edge to `other`.
    pub fn contains_edge(&self, node: &str, other: &str) -> bool {
        self.nodes
            .get(node)
            .is_some_and(|edges| edges.contains(other))
    }

    /// Check whether `node` is a key of the snapshot.
    pub fn contains_node(&self, node: &str) -> bool {
        self.nodes.contains_key(node)
    }

    /// Iterate over `(node, edges)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexSet<String>)> {
        self.nodes.iter().map(|(node, edges)| (node.as_str(), edges))
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the snapshot has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(IndexSet::len).sum()
    }

    /// Serialize as a JSON object of name → array of names.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Group nodes into dependency levels. See [`levels`](super::levels).
    pub fn levels(&self) -> Result<Vec<Vec<String>>> {
        super::levels(self)
    }

    /// Render as Graphviz DOT. See [`render_dot`](super::render_dot).
    pub fn to_dot(&self) -> Result<String> {
        super::render_dot(self)
    }
}

impl<K, I, D> FromIterator<(K, I)> for DependencySnapshot
where
    K: Into<String>,
    I: IntoIterator<Item = D>,
    D: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, I)>>(iter: T) -> Self {
        let mut snapshot = Self::new();
        for (node, edges) in iter {
            snapshot.insert(node, edges);
        }
        snapshot
    }
}
