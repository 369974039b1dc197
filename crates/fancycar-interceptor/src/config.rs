//! Interceptor configuration values.
//!
//! Loading this from disk belongs to the hosting broker process; this crate
//! only consumes the values.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the outbound interceptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterceptorConfig {
    /// Filesystem path of the generation registry database.
    pub store_path: PathBuf,

    /// Maximum number of concurrent generation lookups.
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,

    /// Bounded wait for the lookup-and-transform step, in seconds. When the
    /// wait expires, delivery of that publish is suppressed.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_pool_size() -> usize {
    1
}

fn default_timeout_secs() -> u64 {
    10
}
