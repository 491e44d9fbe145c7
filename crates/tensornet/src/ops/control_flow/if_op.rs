//! Conditional dispatch between two nested nets.
//!
//! `If` reads a single boolean from its first input and runs exactly one of its
//! compiled branches, or nothing when the condition is false and no `else_net` was
//! given. Both branches are compiled once, at construction, against the same workspace
//! as the enclosing net, so anything a branch writes is visible afterwards. Inputs past
//! the first and all outputs are declarative only: they let graph analysis see what the
//! branches read and write.

use std::sync::Arc;

use crate::config::ExecutorConfig;
use crate::context::{Context, ContextTensor};
use crate::definition::{ArgValue, ArgumentHelper, NetDef, OperatorDef};
use crate::error::{OperatorError, OperatorResult};
use crate::net::{create_net_with_config, Net};
use crate::operator::{CreateOperator, DeviceOperator, OperatorBase};
use crate::tensor::DType;
use crate::workspace::Workspace;

pub const THEN_NET_ARG: &str = "then_net";
pub const ELSE_NET_ARG: &str = "else_net";

pub struct IfOp<C: Context> {
    base: OperatorBase,
    context: C,
    then_net: Box<dyn Net>,
    else_net: Option<Box<dyn Net>>,
}

impl<C: Context> IfOp<C> {
    /// Builds the operator with the process-wide [`ExecutorConfig`].
    pub fn new(def: &OperatorDef, ws: &Arc<Workspace>) -> OperatorResult<Self> {
        Self::with_config(def, ws, &ExecutorConfig::default())
    }

    /// Builds the operator, compiling its branches with `config`.
    pub fn with_config(
        def: &OperatorDef,
        ws: &Arc<Workspace>,
        config: &ExecutorConfig,
    ) -> OperatorResult<Self> {
        let base = OperatorBase::new(def, ws)?;
        let context = C::new(base.device_option())?;
        let args = ArgumentHelper::new(def)?;

        // Branches without their own placement run on the If operator's device.
        let config = config
            .clone()
            .with_default_device(base.device_option().device_type.as_str());

        let then_def = match args.value(THEN_NET_ARG) {
            Some(ArgValue::Net(net)) => net,
            _ => {
                return Err(OperatorError::configuration(
                    base.name(),
                    "then_net must be specified in If operator",
                ))
            }
        };
        let then_net = compile_branch(&base, then_def, ws, &config, "then")?;

        let else_net = match args.value(ELSE_NET_ARG) {
            None => None,
            Some(ArgValue::Net(net)) => Some(compile_branch(&base, net, ws, &config, "else")?),
            Some(other) => {
                return Err(OperatorError::configuration(
                    base.name(),
                    format!(
                        "else_net in If operator must be a net, found '{}'",
                        other.kind()
                    ),
                ))
            }
        };

        Ok(Self {
            base,
            context,
            then_net,
            else_net,
        })
    }

    pub fn has_else_branch(&self) -> bool {
        self.else_net.is_some()
    }

    pub fn then_net(&self) -> &dyn Net {
        self.then_net.as_ref()
    }

    pub fn else_net(&self) -> Option<&dyn Net> {
        self.else_net.as_deref()
    }

    /// Validates the condition input and reads its value.
    ///
    /// The blob lock is released before returning so branches may overwrite the
    /// condition.
    fn read_condition(&self) -> OperatorResult<bool> {
        let blob = self.base.input(0).read();
        let tensor = match blob.get::<C::Tensor>() {
            Some(tensor) if tensor.dtype() == DType::Bool => tensor,
            Some(tensor) => {
                return Err(OperatorError::type_mismatch(
                    self.base.name(),
                    "Invalid condition in If operator: tensor expected",
                    "bool tensor",
                    format!("{} tensor", tensor.dtype().name()),
                ))
            }
            None => {
                return Err(OperatorError::type_mismatch(
                    self.base.name(),
                    "Invalid condition in If operator: tensor expected",
                    format!("bool tensor on '{}'", C::DEVICE),
                    blob.type_name(),
                ))
            }
        };
        if tensor.len() != 1 {
            return Err(OperatorError::shape_mismatch(
                self.base.name(),
                "Invalid condition tensor in If operator: single value expected",
                "1 element",
                format!("{} elements (shape {})", tensor.len(), tensor.shape()),
            ));
        }
        let host = self
            .context
            .copy_to_host(tensor)
            .map_err(|err| OperatorError::execution(self.base.name(), err))?;
        let values = host
            .data::<bool>()
            .map_err(|err| OperatorError::execution(self.base.name(), err))?;
        Ok(values[0])
    }
}

fn compile_branch(
    base: &OperatorBase,
    def: &NetDef,
    ws: &Arc<Workspace>,
    config: &ExecutorConfig,
    branch: &str,
) -> OperatorResult<Box<dyn Net>> {
    create_net_with_config(def, ws, config).map_err(|err| {
        OperatorError::initialization(
            base.name(),
            format!("failed to initialize {branch} subnet"),
            err,
        )
    })
}

impl<C: Context> CreateOperator for IfOp<C> {
    fn create(
        def: &OperatorDef,
        ws: &Arc<Workspace>,
        config: &ExecutorConfig,
    ) -> OperatorResult<Self> {
        Self::with_config(def, ws, config)
    }
}

impl<C: Context> DeviceOperator for IfOp<C> {
    type Context = C;

    fn base(&self) -> &OperatorBase {
        &self.base
    }

    fn context(&self) -> &C {
        &self.context
    }

    fn run_on_device(&mut self) -> OperatorResult<bool> {
        let condition = self.read_condition()?;
        let op = self.base.name();
        if condition {
            tracing::debug!(op, net = self.then_net.name(), "running then branch");
            self.then_net.run()
        } else if let Some(else_net) = self.else_net.as_mut() {
            tracing::debug!(op, net = else_net.name(), "running else branch");
            else_net.run()
        } else {
            tracing::debug!(op, "condition is false and no else branch");
            Ok(true)
        }
    }
}
