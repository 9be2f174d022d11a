//! Graph Nodes
//!
//! This module defines the declared computation units of a graph.

use std::fmt;

use super::Graph;
use crate::error::Result;

/// Identifier for a node within its [`NodeTable`](super::NodeTable).
///
/// Ids are dense indices assigned in declaration order. They are only
/// meaningful for graphs built from the table that assigned them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the raw index.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for NodeId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// The computation behind a node.
///
/// A producer receives the graph it is being evaluated on (to read owner
/// state and evaluate other nodes) plus the positional arguments of the call.
pub type Producer<S, V> = Box<dyn Fn(&Graph<S, V>, &[V]) -> Result<V>>;

/// How a node obtains its value.
pub enum NodeKind<S, V> {
    /// The value only ever comes from the producer.
    Computed(Producer<S, V>),

    /// The producer supplies the initial value, but the node may also be
    /// written directly with [`Graph::set`].
    Settable(Producer<S, V>),
}

impl<S, V> NodeKind<S, V> {
    fn producer(&self) -> &Producer<S, V> {
        match self {
            NodeKind::Computed(producer) | NodeKind::Settable(producer) => producer,
        }
    }
}

/// A declared node: a unique name plus its producer.
pub struct Node<S, V> {
    name: String,
    kind: NodeKind<S, V>,
}

impl<S, V> Node<S, V> {
    /// Create a node that can only be computed.
    pub fn computed<F>(name: impl Into<String>, producer: F) -> Self
    where
        F: Fn(&Graph<S, V>, &[V]) -> Result<V> + 'static,
    {
        Self {
            name: name.into(),
            kind: NodeKind::Computed(Box::new(producer)),
        }
    }

    /// Create a node whose value may also be set directly.
    pub fn settable<F>(name: impl Into<String>, producer: F) -> Self
    where
        F: Fn(&Graph<S, V>, &[V]) -> Result<V> + 'static,
    {
        Self {
            name: name.into(),
            kind: NodeKind::Settable(Box::new(producer)),
        }
    }

    /// Get the node's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the node's kind.
    pub fn kind(&self) -> &NodeKind<S, V> {
        &self.kind
    }

    /// Check whether [`Graph::set`] is allowed on this node.
    pub fn is_settable(&self) -> bool {
        matches!(self.kind, NodeKind::Settable(_))
    }

    /// Run the producer.
    pub(crate) fn produce(&self, graph: &Graph<S, V>, args: &[V]) -> Result<V> {
        (self.kind.producer())(graph, args)
    }
}

impl<S, V> fmt::Debug for Node<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("settable", &self.is_settable())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settable_flag_follows_kind() {
        let computed: Node<(), i64> = Node::computed("B", |_, _| Ok(1));
        let settable: Node<(), i64> = Node::settable("A", |_, _| Ok(10));

        assert!(!computed.is_settable());
        assert!(settable.is_settable());
        assert!(matches!(settable.kind(), NodeKind::Settable(_)));
    }

    #[test]
    fn debug_omits_producer() {
        let node: Node<(), i64> = Node::settable("A", |_, _| Ok(10));
        assert_eq!(format!("{:?}", node), r#"Node { name: "A", settable: true }"#);
    }

    #[test]
    fn node_id_round_trips_index() {
        let id = NodeId::from(3);
        assert_eq!(id.index(), 3);
        assert_eq!(id, NodeId::new(3));
    }
}
