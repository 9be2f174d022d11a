//! Recalc Core
//!
//! This crate provides an incremental computation graph in the spirit of a
//! spreadsheet recalculation engine. It implements:
//!
//! - Named computation nodes declared once per owning type
//! - Lazy, memoized evaluation
//! - Dependency discovery at evaluation time via an explicit call stack
//! - Cascading cache invalidation when a settable node changes
//!
//! # Architecture
//!
//! - `graph`: node declarations, evaluation, cache, tracking and invalidation
//! - `diagnostics`: adjacency snapshots, leveling and DOT rendering
//! - `config`: per-instance options
//! - `error`: the crate error type
//!
//! # Example
//!
//! ```rust
//! use recalc_core::graph::{Graph, NodeTable};
//!
//! let table = NodeTable::<(), i64>::builder()
//!     .settable("A", |_, _| Ok(10))
//!     .computed("B", |g, _| Ok(g.get("A")?.pow(2)))
//!     .computed("C", |g, _| Ok(g.get("B")? + g.get("A")?))
//!     .build()?;
//!
//! let graph = Graph::new(table, ());
//! assert_eq!(graph.get("C")?, 110);
//!
//! // Writing A evicts B and C; they recompute on the next read.
//! graph.set("A", 3)?;
//! assert_eq!(graph.get("C")?, 12);
//! # Ok::<(), recalc_core::GraphError>(())
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod graph;

pub use config::GraphConfig;
pub use diagnostics::DependencySnapshot;
pub use error::{GraphError, Result};
pub use graph::{Graph, NodeId, NodeTable};
