//! Graph Instances
//!
//! A [`Graph`] is one owning object: a shared [`NodeTable`], the owner's own
//! state, and the per-instance cache, evaluation stack and adjacency.
//!
//! # How Evaluation Works
//!
//! 1. The node is entered on the tracker, which links it to every frame
//!    currently on the stack and pushes a new frame.
//!
//! 2. If the cache holds a value computed for the same arguments, it is
//!    returned without running the producer.
//!
//! 3. Otherwise the producer runs. It may evaluate other nodes on the same
//!    graph, which recurses through this path and is how dependencies are
//!    discovered.
//!
//! 4. The result is cached and the frame is popped.
//!
//! Invalidation is lazy: [`Graph::set`] and [`Graph::invalidate`] only evict
//! cached values along `dependents`; nothing recomputes until the next
//! evaluation asks for it.
//!
//! # Threading
//!
//! All mutable state sits behind `RefCell`, so a graph is `!Sync` and must be
//! driven from one thread. Producers receive `&Graph` and re-enter it freely.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

use super::cache::EvaluationCache;
use super::node::NodeId;
use super::table::NodeTable;
use super::tracker::{DependencyTracker, EvaluationFrame};
use crate::config::GraphConfig;
use crate::diagnostics::DependencySnapshot;
use crate::error::{GraphError, Result};

/// An owning object's incremental computation graph.
///
/// # Type Parameters
///
/// - `S`: owner state that producers can read through [`Graph::state`].
/// - `V`: the value type shared by every node. `PartialEq` is needed to
///   compare the arguments of argument-carrying calls against the cache slot.
pub struct Graph<S, V> {
    table: Rc<NodeTable<S, V>>,
    state: S,
    config: GraphConfig,
    cache: RefCell<EvaluationCache<V>>,
    tracker: RefCell<DependencyTracker>,
}

impl<S, V> Graph<S, V>
where
    V: Clone + PartialEq,
{
    /// Create an instance with the default configuration.
    pub fn new(table: Rc<NodeTable<S, V>>, state: S) -> Self {
        Self::with_config(table, state, GraphConfig::default())
    }

    /// Create an instance with an explicit configuration.
    pub fn with_config(table: Rc<NodeTable<S, V>>, state: S, config: GraphConfig) -> Self {
        let node_count = table.len();
        Self {
            table,
            state,
            config,
            cache: RefCell::new(EvaluationCache::new(node_count)),
            tracker: RefCell::new(DependencyTracker::new(node_count)),
        }
    }

    /// The shared declarations.
    pub fn table(&self) -> &Rc<NodeTable<S, V>> {
        &self.table
    }

    /// The owner's non-node state.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// The instance configuration.
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Evaluate a node without arguments.
    pub fn get(&self, name: &str) -> Result<V> {
        self.evaluate(name, &[])
    }

    /// Evaluate a node by name.
    ///
    /// Producer errors are returned unchanged, and the evaluation stack is
    /// unwound so the graph stays usable.
    pub fn evaluate(&self, name: &str, args: &[V]) -> Result<V> {
        let id = self.table.resolve(name)?;
        self.evaluate_id(id, args)
    }

    /// Evaluate a node by id.
    ///
    /// Ids not issued by this graph's table fail with
    /// [`GraphError::UnknownNode`].
    pub fn evaluate_id(&self, id: NodeId, args: &[V]) -> Result<V> {
        let node = self
            .table
            .get(id)
            .ok_or_else(|| GraphError::UnknownNode(format!("#{}", id.index())))?;

        let Some(_frame) = EvaluationFrame::enter(&self.tracker, id, self.config.max_depth) else {
            return Err(GraphError::DepthExceeded {
                node: node.name().to_string(),
                limit: self.config.max_depth.unwrap_or_default(),
            });
        };

        tracing::debug!(node = node.name(), "looking up cache");
        let cached = self.cache.borrow().get(id, args).cloned();
        if let Some(value) = cached {
            if self.config.log_cache_hits {
                tracing::debug!(node = node.name(), "cache hit");
            }
            return Ok(value);
        }

        let value = node.produce(self, args)?;

        tracing::debug!(node = node.name(), "caching value");
        self.cache.borrow_mut().put(id, args, value.clone());
        Ok(value)
    }

    /// Write a settable node and invalidate everything that depends on it.
    ///
    /// Fails with [`GraphError::NotSettable`] for computed nodes.
    pub fn set(&self, name: &str, value: V) -> Result<()> {
        let id = self.table.resolve(name)?;
        if !self.table.node(id).is_settable() {
            return Err(GraphError::NotSettable(name.to_string()));
        }

        self.invalidate_from(id);
        self.cache.borrow_mut().put(id, &[], value);
        tracing::debug!(node = name, "value set");
        Ok(())
    }

    /// Evict a node and, transitively, every node recorded as depending on
    /// it.
    ///
    /// Each node is visited at most once per call, so a cyclic dependents
    /// relation terminates instead of recursing forever.
    pub fn invalidate(&self, name: &str) -> Result<()> {
        let id = self.table.resolve(name)?;
        self.invalidate_from(id);
        Ok(())
    }

    fn invalidate_from(&self, id: NodeId) {
        let mut visited = vec![false; self.table.len()];
        self.invalidate_id(id, &mut visited);
    }

    fn invalidate_id(&self, id: NodeId, visited: &mut [bool]) {
        if std::mem::replace(&mut visited[id.index()], true) {
            return;
        }

        if self.cache.borrow_mut().evict(id).is_some() {
            tracing::debug!(node = self.table.name(id), "invalidated");
        }

        let dependents: SmallVec<[NodeId; 8]> = self
            .tracker
            .borrow()
            .graph()
            .dependents(id)
            .iter()
            .copied()
            .collect();

        for dependent in dependents {
            self.invalidate_id(dependent, visited);
        }
    }

    /// Check whether a node currently holds a memoized value.
    pub fn is_cached(&self, name: &str) -> Result<bool> {
        let id = self.table.resolve(name)?;
        Ok(self.cache.borrow().contains(id))
    }

    /// Number of nodes currently holding a memoized value.
    pub fn cached_len(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Names of the nodes `name` has been observed to need.
    pub fn dependencies_of(&self, name: &str) -> Result<Vec<&str>> {
        let id = self.table.resolve(name)?;
        let tracker = self.tracker.borrow();
        Ok(self.names(tracker.graph().dependencies(id)))
    }

    /// Names of the nodes observed to need `name`.
    pub fn dependents_of(&self, name: &str) -> Result<Vec<&str>> {
        let id = self.table.resolve(name)?;
        let tracker = self.tracker.borrow();
        Ok(self.names(tracker.graph().dependents(id)))
    }

    /// Snapshot of the forward adjacency, covering every declared node.
    pub fn dependency_graph(&self) -> DependencySnapshot {
        let tracker = self.tracker.borrow();
        self.snapshot(|id| self.names(tracker.graph().dependencies(id)))
    }

    /// Snapshot of the reverse adjacency, covering every declared node.
    pub fn dependents_graph(&self) -> DependencySnapshot {
        let tracker = self.tracker.borrow();
        self.snapshot(|id| self.names(tracker.graph().dependents(id)))
    }

    /// Names of the in-flight evaluations, outermost first.
    pub fn evaluation_stack(&self) -> Vec<&str> {
        let tracker = self.tracker.borrow();
        self.names(tracker.stack())
    }

    fn names<'a>(&self, ids: impl IntoIterator<Item = &'a NodeId>) -> Vec<&str> {
        ids.into_iter().map(|&id| self.table.name(id)).collect()
    }

    fn snapshot<'a>(&'a self, edges: impl Fn(NodeId) -> Vec<&'a str>) -> DependencySnapshot {
        self.table
            .iter()
            .map(|(id, node)| (node.name(), edges(id)))
            .collect()
    }
}

impl<S, V> fmt::Debug for Graph<S, V>
where
    S: fmt::Debug,
    V: Clone + PartialEq,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("state", &self.state)
            .field("node_count", &self.table.len())
            .field("cached", &self.cached_len())
            .field("edges", &self.tracker.borrow().graph().edge_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Owner state counting producer runs.
    #[derive(Debug, Default)]
    struct Counters {
        a: Cell<usize>,
        b: Cell<usize>,
        c: Cell<usize>,
    }

    fn bump(counter: &Cell<usize>) {
        counter.set(counter.get() + 1);
    }

    fn abc() -> Graph<Counters, i64> {
        let table = NodeTable::builder()
            .settable("A", |g: &Graph<Counters, i64>, _| {
                bump(&g.state().a);
                Ok(10)
            })
            .computed("B", |g: &Graph<Counters, i64>, _| {
                bump(&g.state().b);
                Ok(g.get("A")?.pow(2))
            })
            .computed("C", |g: &Graph<Counters, i64>, _| {
                bump(&g.state().c);
                Ok(g.get("B")? + g.get("A")?)
            })
            .build()
            .unwrap();
        Graph::new(table, Counters::default())
    }

    #[test]
    fn evaluation_memoizes() {
        let graph = abc();

        assert_eq!(graph.get("C").unwrap(), 110);
        assert_eq!(graph.get("C").unwrap(), 110);
        assert_eq!(graph.get("B").unwrap(), 100);

        assert_eq!(graph.state().a.get(), 1);
        assert_eq!(graph.state().b.get(), 1);
        assert_eq!(graph.state().c.get(), 1);
        assert_eq!(graph.cached_len(), 3);
    }

    #[test]
    fn set_invalidates_dependents_and_keeps_new_value() {
        let graph = abc();
        assert_eq!(graph.get("C").unwrap(), 110);

        graph.set("A", 3).unwrap();
        assert!(graph.is_cached("A").unwrap());
        assert!(!graph.is_cached("B").unwrap());
        assert!(!graph.is_cached("C").unwrap());

        assert_eq!(graph.get("C").unwrap(), 12);

        // A's producer never reran; its value came from `set`.
        assert_eq!(graph.state().a.get(), 1);
        assert_eq!(graph.state().b.get(), 2);
        assert_eq!(graph.state().c.get(), 2);
    }

    #[test]
    fn set_on_computed_node_is_rejected() {
        let graph = abc();
        let err = graph.set("B", 1).unwrap_err();
        assert!(matches!(err, GraphError::NotSettable(name) if name == "B"));
    }

    #[test]
    fn unknown_names_are_usage_errors() {
        let graph = abc();
        assert!(matches!(graph.get("Z"), Err(GraphError::UnknownNode(_))));
        assert!(matches!(graph.set("Z", 1), Err(GraphError::UnknownNode(_))));
        assert!(matches!(graph.invalidate("Z"), Err(GraphError::UnknownNode(_))));
    }

    #[test]
    fn foreign_id_is_a_usage_error() {
        let graph = abc();

        let err = graph.evaluate_id(NodeId::from(7), &[]).unwrap_err();
        assert!(matches!(err, GraphError::UnknownNode(name) if name == "#7"));
        assert!(graph.evaluation_stack().is_empty());

        // Ids from the table still evaluate.
        let c = graph.table().resolve("C").unwrap();
        assert_eq!(graph.evaluate_id(c, &[]).unwrap(), 110);
    }

    #[test]
    fn invalidation_terminates_on_cyclic_dependents() {
        // P reads Q while the flag is set; Q reads P once it is cleared.
        let table = NodeTable::<(), i64>::builder()
            .settable("Flag", |_, _| Ok(1))
            .computed("P", |g, _| {
                if g.get("Flag")? == 1 {
                    g.get("Q")
                } else {
                    Ok(0)
                }
            })
            .computed("Q", |g, _| {
                if g.get("Flag")? == 0 {
                    g.get("P")
                } else {
                    Ok(1)
                }
            })
            .build()
            .unwrap();
        let graph = Graph::new(table, ());

        assert_eq!(graph.get("P").unwrap(), 1);
        graph.set("Flag", 0).unwrap();
        assert_eq!(graph.get("Q").unwrap(), 0);

        assert_eq!(graph.dependencies_of("P").unwrap(), vec!["Flag", "Q"]);
        assert!(graph.dependencies_of("Q").unwrap().contains(&"P"));

        graph.invalidate("P").unwrap();
        assert!(!graph.is_cached("P").unwrap());
        assert!(!graph.is_cached("Q").unwrap());
        assert!(graph.is_cached("Flag").unwrap());
    }

    #[test]
    fn direct_invalidate_evicts_node_and_dependents() {
        let graph = abc();
        graph.get("C").unwrap();

        graph.invalidate("B").unwrap();
        assert!(graph.is_cached("A").unwrap());
        assert!(!graph.is_cached("B").unwrap());
        assert!(!graph.is_cached("C").unwrap());
    }

    #[test]
    fn stack_is_empty_between_calls() {
        let graph = abc();
        graph.get("C").unwrap();
        assert!(graph.evaluation_stack().is_empty());
    }

    #[test]
    fn snapshot_covers_every_declared_node() {
        let graph = abc();
        assert_eq!(graph.dependency_graph().len(), 3);

        graph.get("C").unwrap();
        let snapshot = graph.dependency_graph();
        assert!(snapshot.dependencies_of("A").unwrap().is_empty());
        assert!(snapshot.contains_edge("B", "A"));
        assert!(snapshot.contains_edge("C", "A"));
        assert!(snapshot.contains_edge("C", "B"));

        let dependents = graph.dependents_graph();
        assert!(dependents.contains_edge("A", "B"));
        assert!(dependents.contains_edge("A", "C"));
    }

    #[test]
    fn debug_reports_counts() {
        let graph = abc();
        graph.get("B").unwrap();
        let text = format!("{:?}", graph);
        assert!(text.contains("node_count: 3"));
        assert!(text.contains("cached: 2"));
    }
}
