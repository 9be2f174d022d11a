//! Error Types
//!
//! Every fallible operation in the crate returns [`GraphError`]. Usage errors
//! (unknown names, writes to computed nodes) are fatal to the call but leave
//! the graph instance usable. Producer errors pass through untouched.

use thiserror::Error;

/// Errors produced by graph declaration, evaluation and diagnostics.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The name is not declared in the node table.
    #[error("unknown node: {0}")]
    UnknownNode(String),

    /// `set` was called on a node that was not declared settable.
    #[error("node `{0}` is not settable")]
    NotSettable(String),

    /// Two declarations share the same name.
    #[error("node `{0}` is declared more than once")]
    DuplicateNode(String),

    /// The configured evaluation depth guard tripped.
    #[error("evaluation depth limit of {limit} exceeded while entering `{node}`")]
    DepthExceeded { node: String, limit: usize },

    /// A dependency snapshot could not be leveled.
    #[error("dependency graph has a cycle through: {}", .0.join(", "))]
    Cycle(Vec<String>),

    /// Failure raised by a node's own computation.
    #[error(transparent)]
    Producer(Box<dyn std::error::Error + Send + Sync + 'static>),

    /// Configuration or snapshot JSON could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl GraphError {
    /// Wrap an arbitrary error raised inside a producer.
    pub fn producer<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self::Producer(error.into())
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, GraphError>;
