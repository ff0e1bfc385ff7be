//! Service configuration.
//!
//! Configuration is explicit and passed at construction time; nothing in the
//! crate reads ambient environment state to change behavior.

use serde::{Deserialize, Serialize};

/// Default ceiling on output width and height, in pixels.
pub const DEFAULT_MAX_DIMENSION: u32 = 4096;

/// Default ceiling on encoded output size: 10 MiB.
pub const DEFAULT_MAX_OUTPUT_BYTES: u64 = 10 * 1024 * 1024;

/// Configuration for the transform service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformConfig {
    /// Upper bound on output width and height; `None` disables resizing
    #[serde(rename = "maxDimension")]
    pub max_dimension: Option<u32>,
    /// Upper bound on encoded output size; `None` disables the size cap
    #[serde(rename = "maxOutputBytes")]
    pub max_output_bytes: Option<u64>,
    /// Number of transforms allowed to run concurrently
    pub workers: usize,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            max_dimension: Some(DEFAULT_MAX_DIMENSION),
            max_output_bytes: Some(DEFAULT_MAX_OUTPUT_BYTES),
            workers: optimal_workers(),
        }
    }
}

/// Default worker budget for concurrent transforms.
pub fn optimal_workers() -> usize {
    let cpu_count = num_cpus::get();
    // Use 90% of CPUs with no upper limit, minimum of 2 workers
    ((cpu_count * 9) / 10).max(2)
}
