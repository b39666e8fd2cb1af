//! Configuration and defaults for interlap.
//!
//! This module contains the configuration structure and default values
//! that control how query files are processed.

use anyhow::{bail, Result};

use crate::types::QueryMode;

/// Default number of query regions read and processed per chunk.
pub const DEFAULT_BATCH_SIZE: usize = 5000;

/// Default number of worker threads.
pub const DEFAULT_THREADS: usize = 8;

/// Configuration for an interlap run.
#[derive(Debug, Clone)]
pub struct Config {
    /// What to compute for each query region.
    pub mode: QueryMode,
    /// Worker threads (0 = auto-detect).
    pub threads: usize,
    /// Query regions per chunk.
    pub batch_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            mode: QueryMode::Overlap,
            threads: DEFAULT_THREADS,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl Config {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that the settings can be used.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            bail!("Batch size must be greater than 0");
        }
        Ok(())
    }

    /// Resolve the thread count, replacing 0 with the number of CPUs.
    pub fn worker_threads(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        }
    }
}
