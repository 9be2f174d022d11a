//! Computation Graph
//!
//! This module implements the incremental computation graph: named nodes
//! evaluated lazily, memoized after first evaluation, and invalidated along
//! dependency edges discovered while evaluating.
//!
//! # Overview
//!
//! - A [`NodeTable`] is declared once per owning type and shared by every
//!   [`Graph`] instance of that type.
//! - Each [`Graph`] owns its cache, its evaluation stack and the adjacency
//!   recorded so far.
//! - Edges are discovered at run time by the [`DependencyTracker`]; nothing
//!   is declared statically.
//!
//! # Design Decisions
//!
//! 1. Nodes are dense integer ids into the table. Adjacency is two plain
//!    tables (forward and reverse) rather than links between node objects.
//!
//! 2. Edges are never removed, so conditional producers accumulate the union
//!    of every branch they have taken. Invalidation may evict more than the
//!    branch actually taken needs.
//!
//! 3. A cache hit does not rediscover what the cached node reads. Ancestors
//!    that first reach a node through a cached intermediate miss those
//!    transitive edges.

mod adjacency;
mod cache;
mod instance;
mod node;
mod table;
mod tracker;

pub use adjacency::DependencyGraph;
pub use cache::EvaluationCache;
pub use instance::Graph;
pub use node::{Node, NodeId, NodeKind, Producer};
pub use table::{NodeTable, NodeTableBuilder};
pub use tracker::{DependencyTracker, EvaluationFrame};
