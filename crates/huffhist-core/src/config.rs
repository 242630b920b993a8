use serde::Deserialize;
use std::path::Path;

use crate::error::{HistError, HistResult};
use crate::reader::DEFAULT_BLOCK_SIZE;

/// Tuning knobs for one histogram build.
///
/// Every field is optional in TOML; missing keys fall back to [`Default`].
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Number of worker threads sharing the stream.
    pub workers: usize,
    /// Bytes claimed from the stream per read.
    pub block_size: usize,
    /// Pin each worker thread to a CPU core.
    pub pin_workers: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get(),
            block_size: DEFAULT_BLOCK_SIZE,
            pin_workers: false,
        }
    }
}

impl BuildConfig {
    pub fn from_toml_str(source: &str) -> HistResult<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_file(path: &Path) -> HistResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn with_pinning(mut self, enabled: bool) -> Self {
        self.pin_workers = enabled;
        self
    }

    /// Rejects a pool with no workers or a zero-length block.
    pub fn validate(&self) -> HistResult<()> {
        if self.workers == 0 {
            return Err(HistError::InvalidWorkerCount(self.workers));
        }
        if self.block_size == 0 {
            return Err(HistError::InvalidBlockSize(self.block_size));
        }
        Ok(())
    }
}
