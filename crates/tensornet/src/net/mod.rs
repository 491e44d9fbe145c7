//! Nets: executable operator sequences compiled from a [`NetDef`].
//!
//! Nets are created against a shared workspace handle and own their operators. A net is
//! fully built before it runs; running never re-reads the definition.

mod simple;

use std::sync::Arc;

pub use simple::SimpleNet;

use crate::config::ExecutorConfig;
use crate::definition::NetDef;
use crate::error::{OperatorError, OperatorResult};
use crate::workspace::Workspace;

/// Executable graph created from a [`NetDef`].
pub trait Net: Send {
    fn name(&self) -> &str;

    /// Runs every operator once.
    ///
    /// Returns `Ok(false)` when an operator reports failure; later operators are not run.
    fn run(&mut self) -> OperatorResult<bool>;

    fn external_inputs(&self) -> &[String];

    fn external_outputs(&self) -> &[String];

    fn num_operators(&self) -> usize;
}

/// Builds a net with the process-wide [`ExecutorConfig`].
pub fn create_net(def: &NetDef, ws: &Arc<Workspace>) -> OperatorResult<Box<dyn Net>> {
    create_net_with_config(def, ws, &ExecutorConfig::default())
}

/// Builds a net, selecting the executor from `def.net_type`.
pub fn create_net_with_config(
    def: &NetDef,
    ws: &Arc<Workspace>,
    config: &ExecutorConfig,
) -> OperatorResult<Box<dyn Net>> {
    match def.net_type.as_str() {
        "" | "simple" => Ok(Box::new(SimpleNet::new(def, ws, config)?)),
        other => Err(OperatorError::UnsupportedNetType {
            net: def.name.clone(),
            net_type: other.to_string(),
        }),
    }
}
