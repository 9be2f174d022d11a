//! Graph Configuration
//!
//! Per-instance knobs. The defaults reproduce the unguarded behavior: no
//! depth limit, so a true producer cycle recurses until the native stack is
//! exhausted.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Options applied to a single graph instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Maximum number of in-flight evaluations. `None` disables the guard.
    pub max_depth: Option<usize>,

    /// Emit a debug event for every cache hit.
    pub log_cache_hits: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            log_cache_hits: true,
        }
    }
}

impl GraphConfig {
    /// Parse a configuration from a JSON string. Missing fields take their
    /// default values.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Enable the depth guard.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}
