//! Dependency Tracker
//!
//! The tracker attributes dependencies by watching which nodes are entered
//! while others are still being evaluated.
//!
//! # Implementation
//!
//! Each graph instance keeps an explicit stack of in-flight node ids. When a
//! node is entered, it is recorded as a dependency of *every* frame on the
//! stack, not only the direct caller, so transitive relationships land as
//! flat edges and invalidation never has to walk `dependencies` again.
//!
//! Recording happens before the cache is consulted. A cache hit therefore
//! still links the callee to the current stack, but whatever the callee
//! itself reads is not rediscovered: with `F -> E -> D -> B -> A` and `B`
//! already cached, `F` never records `A` through that path.

use std::cell::RefCell;

use smallvec::SmallVec;

use super::adjacency::DependencyGraph;
use super::node::NodeId;

/// Evaluation stack plus the adjacency it has produced so far.
#[derive(Debug)]
pub struct DependencyTracker {
    stack: SmallVec<[NodeId; 16]>,
    graph: DependencyGraph,
}

impl DependencyTracker {
    /// Create a tracker for `node_count` nodes with an empty stack.
    pub fn new(node_count: usize) -> Self {
        Self {
            stack: SmallVec::new(),
            graph: DependencyGraph::new(node_count),
        }
    }

    /// Record `id` against every frame on the stack, then push it.
    pub fn enter(&mut self, id: NodeId) {
        for &frame in &self.stack {
            if self.graph.add_edge(id, frame) {
                tracing::trace!(
                    dependent = frame.index(),
                    dependency = id.index(),
                    "recorded dependency"
                );
            }
        }
        self.stack.push(id);
    }

    /// Pop the frame for `id`.
    pub fn exit(&mut self, id: NodeId) {
        let popped = self.stack.pop();

        // Frames are strictly nested; a mismatch means a guard was leaked.
        debug_assert_eq!(
            popped,
            Some(id),
            "evaluation stack mismatch: expected {:?}, got {:?}",
            id,
            popped
        );
    }

    /// Number of in-flight evaluations.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// In-flight node ids, outermost first.
    pub fn stack(&self) -> &[NodeId] {
        &self.stack
    }

    /// The adjacency discovered so far.
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }
}

/// Guard that pops its frame when dropped.
///
/// The frame is popped on every exit path of an evaluation: normal return,
/// a producer error propagated with `?`, or a panic unwinding through the
/// producer.
pub struct EvaluationFrame<'a> {
    tracker: &'a RefCell<DependencyTracker>,
    id: NodeId,
}

impl<'a> EvaluationFrame<'a> {
    /// Enter `id` on the tracker.
    ///
    /// Returns `None` without touching the tracker if `max_depth` frames are
    /// already in flight.
    pub fn enter(
        tracker: &'a RefCell<DependencyTracker>,
        id: NodeId,
        max_depth: Option<usize>,
    ) -> Option<Self> {
        let mut inner = tracker.borrow_mut();
        if max_depth.is_some_and(|limit| inner.depth() >= limit) {
            return None;
        }
        inner.enter(id);
        Some(Self { tracker, id })
    }
}

impl Drop for EvaluationFrame<'_> {
    fn drop(&mut self) {
        self.tracker.borrow_mut().exit(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_records_against_whole_stack() {
        let (f, e, d) = (NodeId::new(0), NodeId::new(1), NodeId::new(2));
        let mut tracker = DependencyTracker::new(3);

        tracker.enter(f);
        tracker.enter(e);
        tracker.enter(d);

        // d is a dependency of both e and f, not just its direct caller.
        assert!(tracker.graph().dependencies(e).contains(&d));
        assert!(tracker.graph().dependencies(f).contains(&d));
        assert!(tracker.graph().dependencies(f).contains(&e));
        assert_eq!(tracker.graph().dependents(d).len(), 2);

        tracker.exit(d);
        tracker.exit(e);
        tracker.exit(f);
        assert_eq!(tracker.depth(), 0);
    }

    #[test]
    fn root_entry_records_nothing() {
        let mut tracker = DependencyTracker::new(1);
        tracker.enter(NodeId::new(0));
        assert_eq!(tracker.graph().edge_count(), 0);
        assert_eq!(tracker.stack(), &[NodeId::new(0)]);
    }

    #[test]
    fn frame_pops_on_drop() {
        let tracker = RefCell::new(DependencyTracker::new(2));

        {
            let _outer = EvaluationFrame::enter(&tracker, NodeId::new(0), None).unwrap();
            {
                let _inner = EvaluationFrame::enter(&tracker, NodeId::new(1), None).unwrap();
                assert_eq!(tracker.borrow().depth(), 2);
            }
            assert_eq!(tracker.borrow().stack(), &[NodeId::new(0)]);
        }

        assert_eq!(tracker.borrow().depth(), 0);
    }

    #[test]
    fn frame_respects_depth_limit() {
        let tracker = RefCell::new(DependencyTracker::new(2));

        let _outer = EvaluationFrame::enter(&tracker, NodeId::new(0), Some(1)).unwrap();
        assert!(EvaluationFrame::enter(&tracker, NodeId::new(1), Some(1)).is_none());

        // The refused entry leaves no trace.
        assert_eq!(tracker.borrow().depth(), 1);
        assert_eq!(tracker.borrow().graph().edge_count(), 0);
    }
}
