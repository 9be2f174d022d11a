//! Node Tables
//!
//! A node table is the immutable set of declarations for one owning type.
//! It is built once with [`NodeTableBuilder`] and then shared (behind an
//! `Rc`) by every graph instance of that type, so all instances see the same
//! node ids.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use super::node::{Node, NodeId};
use super::Graph;
use crate::error::{GraphError, Result};

/// Immutable name → node table shared by graph instances.
pub struct NodeTable<S, V> {
    nodes: IndexMap<String, Node<S, V>>,
}

impl<S, V> NodeTable<S, V> {
    /// Start declaring a new table.
    pub fn builder() -> NodeTableBuilder<S, V> {
        NodeTableBuilder::new()
    }

    /// Number of declared nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if no nodes are declared.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up the id for a declared name.
    pub fn resolve(&self, name: &str) -> Result<NodeId> {
        self.nodes
            .get_index_of(name)
            .map(NodeId::new)
            .ok_or_else(|| GraphError::UnknownNode(name.to_string()))
    }

    /// Get a node by id, or `None` if the id is out of range.
    pub fn get(&self, id: NodeId) -> Option<&Node<S, V>> {
        self.nodes.get_index(id.index()).map(|(_, node)| node)
    }

    /// Get a node by id.
    ///
    /// # Panics
    ///
    /// Panics if the id was not issued by this table.
    pub fn node(&self, id: NodeId) -> &Node<S, V> {
        &self.nodes[id.index()]
    }

    /// Get the name of a node by id.
    pub fn name(&self, id: NodeId) -> &str {
        self.node(id).name()
    }

    /// Iterate over `(id, node)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node<S, V>)> {
        self.nodes
            .values()
            .enumerate()
            .map(|(index, node)| (NodeId::new(index), node))
    }
}

impl<S, V> fmt::Debug for NodeTable<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.nodes.values()).finish()
    }
}

/// Collects declarations and validates them into a [`NodeTable`].
pub struct NodeTableBuilder<S, V> {
    nodes: Vec<Node<S, V>>,
}

impl<S, V> NodeTableBuilder<S, V> {
    fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Declare a node that can only be computed.
    pub fn computed<F>(mut self, name: impl Into<String>, producer: F) -> Self
    where
        F: Fn(&Graph<S, V>, &[V]) -> Result<V> + 'static,
    {
        self.nodes.push(Node::computed(name, producer));
        self
    }

    /// Declare a node that can also be written with [`Graph::set`].
    pub fn settable<F>(mut self, name: impl Into<String>, producer: F) -> Self
    where
        F: Fn(&Graph<S, V>, &[V]) -> Result<V> + 'static,
    {
        self.nodes.push(Node::settable(name, producer));
        self
    }

    /// Declare a prebuilt node.
    pub fn node(mut self, node: Node<S, V>) -> Self {
        self.nodes.push(node);
        self
    }

    /// Finish the declarations.
    ///
    /// Fails with [`GraphError::DuplicateNode`] if two nodes share a name.
    pub fn build(self) -> Result<Rc<NodeTable<S, V>>> {
        let mut nodes = IndexMap::with_capacity(self.nodes.len());
        for node in self.nodes {
            let name = node.name().to_string();
            if nodes.contains_key(&name) {
                return Err(GraphError::DuplicateNode(name));
            }
            nodes.insert(name, node);
        }
        Ok(Rc::new(NodeTable { nodes }))
    }
}
