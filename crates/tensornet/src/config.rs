//! Executor-wide settings applied when nets are created.

use serde::{Deserialize, Serialize};

use crate::env;

/// Settings consulted by [`crate::net::create_net_with_config`].
///
/// `ExecutorConfig::default()` reads `TENSORNET_DEFAULT_DEVICE` and
/// `TENSORNET_STRICT_EXTERNAL_INPUTS` once per process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Device assigned to operators when neither the operator nor its net sets one.
    #[serde(default = "env::default_device")]
    pub default_device: String,
    /// Reject nets whose `external_input` blobs are missing from the workspace.
    #[serde(default = "env::strict_external_inputs")]
    pub strict_external_inputs: bool,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            default_device: env::default_device(),
            strict_external_inputs: env::strict_external_inputs(),
        }
    }
}

impl ExecutorConfig {
    pub fn with_default_device(mut self, device: impl Into<String>) -> Self {
        self.default_device = device.into();
        self
    }

    pub fn with_strict_external_inputs(mut self, strict: bool) -> Self {
        self.strict_external_inputs = strict;
        self
    }
}
