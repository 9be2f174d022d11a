//! Diagnostics
//!
//! Offline inspection of recorded adjacency. Everything here works on a
//! [`DependencySnapshot`] taken with
//! [`Graph::dependency_graph`](crate::graph::Graph::dependency_graph) (or
//! loaded from JSON) and never touches a live graph.
//!
//! Cycle detection lives only here. It sees the edges recorded so far, so it
//! can flag a cycle that would recurse forever on the next evaluation, but it
//! cannot predict edges that have not been observed yet.

mod levels;
mod render;
mod snapshot;

pub use levels::levels;
pub use render::render_dot;
pub use snapshot::DependencySnapshot;
