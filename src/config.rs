//! Graph configuration.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default ceiling on entities per ingestion call.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 500;

/// Tunables for a `MediaGraph`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Largest batch `add_to_graph` accepts. Inference is quadratic in it.
    pub max_batch_size: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self { max_batch_size: DEFAULT_MAX_BATCH_SIZE }
    }
}

impl GraphConfig {
    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_batch_size == 0 {
            return Err(Error::Config("max_batch_size must be at least 1".into()));
        }
        Ok(())
    }
}
