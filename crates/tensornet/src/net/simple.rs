use std::borrow::Cow;
use std::sync::Arc;

use super::Net;
use crate::config::ExecutorConfig;
use crate::context::DeviceOption;
use crate::definition::{NetDef, OperatorDef};
use crate::error::{OperatorError, OperatorResult};
use crate::operator::{create_operator_with_config, Operator};
use crate::workspace::Workspace;

/// Sequential executor: runs operators in definition order on the calling thread.
pub struct SimpleNet {
    name: String,
    operators: Vec<Box<dyn Operator>>,
    external_inputs: Vec<String>,
    external_outputs: Vec<String>,
}

impl SimpleNet {
    pub fn new(
        def: &NetDef,
        ws: &Arc<Workspace>,
        config: &ExecutorConfig,
    ) -> OperatorResult<Self> {
        if config.strict_external_inputs {
            if let Some(missing) = def.external_input.iter().find(|blob| !ws.has_blob(blob)) {
                return Err(OperatorError::MissingBlob {
                    op: format!("net '{}'", def.name),
                    blob: missing.clone(),
                });
            }
        }

        let device = def
            .device_option
            .clone()
            .unwrap_or_else(|| DeviceOption::new(config.default_device.as_str()));

        let mut operators = Vec::with_capacity(def.op.len());
        for op_def in &def.op {
            let op_def = with_device(op_def, &device);
            operators.push(create_operator_with_config(&op_def, ws, config)?);
        }

        tracing::debug!(
            net = def.name.as_str(),
            ops = operators.len(),
            device = device.device_type.as_str(),
            "created net"
        );

        Ok(Self {
            name: def.name.clone(),
            operators,
            external_inputs: def.external_input.clone(),
            external_outputs: def.external_output.clone(),
        })
    }
}

fn with_device<'a>(def: &'a OperatorDef, device: &DeviceOption) -> Cow<'a, OperatorDef> {
    if def.device_option.is_some() {
        return Cow::Borrowed(def);
    }
    let mut owned = def.clone();
    owned.device_option = Some(device.clone());
    Cow::Owned(owned)
}

impl Net for SimpleNet {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&mut self) -> OperatorResult<bool> {
        tracing::trace!(net = self.name.as_str(), "running net");
        for (index, op) in self.operators.iter_mut().enumerate() {
            if !op.run()? {
                tracing::warn!(
                    net = self.name.as_str(),
                    op = op.name(),
                    op_type = op.op_type(),
                    index,
                    "operator reported failure"
                );
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn external_inputs(&self) -> &[String] {
        &self.external_inputs
    }

    fn external_outputs(&self) -> &[String] {
        &self.external_outputs
    }

    fn num_operators(&self) -> usize {
        self.operators.len()
    }
}
