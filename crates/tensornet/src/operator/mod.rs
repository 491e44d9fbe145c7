//! Operator traits and the shared state every operator is built on.
//!
//! Operators are created from an [`OperatorDef`] against a shared [`Workspace`]. At
//! construction they resolve their input blobs (which must already exist) and create
//! their output blobs; afterwards they only touch the workspace through those handles.

pub mod registry;
pub mod schema;

use std::any::Any;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::context::{Context, ContextTensor, DeviceOption};
use crate::definition::OperatorDef;
use crate::error::{OperatorError, OperatorResult};
use crate::workspace::{BlobRef, Workspace};

pub use registry::{
    create_operator, create_operator_with_config, has_operator, register, register_operator,
    registered_operators, CreateOperator, OperatorConstructor, OPERATOR_REGISTRARS,
};
pub use schema::OpSchema;

/// Runnable operator as seen by nets.
pub trait Operator: Send {
    /// Registered operator type (e.g. `"If"`).
    fn op_type(&self) -> &str;

    /// Instance name used in diagnostics.
    fn name(&self) -> &str;

    /// Runs the operator to completion.
    ///
    /// `Ok(false)` reports an ordinary failure that the caller may propagate;
    /// `Err` reports invalid inputs or a broken kernel.
    fn run(&mut self) -> OperatorResult<bool>;
}

/// Operator body bound to a concrete execution context.
///
/// Implementors get [`Operator`] for free: the blanket impl activates the context,
/// runs [`DeviceOperator::run_on_device`], and then waits for the device.
pub trait DeviceOperator: Send {
    type Context: Context;

    fn base(&self) -> &OperatorBase;

    fn context(&self) -> &Self::Context;

    fn run_on_device(&mut self) -> OperatorResult<bool>;
}

impl<T: DeviceOperator> Operator for T {
    fn op_type(&self) -> &str {
        self.base().op_type()
    }

    fn name(&self) -> &str {
        self.base().name()
    }

    fn run(&mut self) -> OperatorResult<bool> {
        tracing::trace!(
            op = self.base().name(),
            device = <T::Context as Context>::DEVICE,
            "running operator"
        );
        self.context().switch_to_device();
        let started = self.run_on_device()?;
        let finished = self.context().finish_device_computation();
        Ok(started && finished)
    }
}

/// Blob handles and identity shared by all operator implementations.
pub struct OperatorBase {
    op_type: String,
    name: String,
    device_option: DeviceOption,
    input_names: SmallVec<[String; 4]>,
    inputs: SmallVec<[BlobRef; 4]>,
    outputs: SmallVec<[BlobRef; 2]>,
}

impl OperatorBase {
    /// Resolves inputs and creates outputs in `ws`.
    ///
    /// Fails with [`OperatorError::MissingBlob`] when an input blob does not exist yet.
    pub fn new(def: &OperatorDef, ws: &Arc<Workspace>) -> OperatorResult<Self> {
        let name = def.display_name().to_string();
        let mut inputs = SmallVec::with_capacity(def.input.len());
        for blob in &def.input {
            let handle = ws.get_blob(blob).ok_or_else(|| OperatorError::MissingBlob {
                op: name.clone(),
                blob: blob.clone(),
            })?;
            inputs.push(handle);
        }
        let outputs = def.output.iter().map(|blob| ws.create_blob(blob)).collect();
        Ok(Self {
            op_type: def.op_type.clone(),
            name,
            device_option: def.device_option.clone().unwrap_or_default(),
            input_names: def.input.iter().cloned().collect(),
            inputs,
            outputs,
        })
    }

    pub fn op_type(&self) -> &str {
        &self.op_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn device_option(&self) -> &DeviceOption {
        &self.device_option
    }

    pub fn input_name(&self, idx: usize) -> &str {
        &self.input_names[idx]
    }

    pub fn input(&self, idx: usize) -> &BlobRef {
        &self.inputs[idx]
    }

    pub fn output(&self, idx: usize) -> &BlobRef {
        &self.outputs[idx]
    }

    /// Clones the tensor stored in input `idx`.
    pub fn input_tensor<T: ContextTensor>(&self, idx: usize) -> OperatorResult<T> {
        let blob = self.inputs[idx].read();
        match blob.get::<T>() {
            Some(tensor) => Ok(tensor.clone()),
            None => Err(OperatorError::type_mismatch(
                &self.name,
                format!("input {idx} ('{}') does not hold a tensor", self.input_names[idx]),
                std::any::type_name::<T>(),
                blob.type_name(),
            )),
        }
    }

    /// Replaces the value stored in output `idx`.
    pub fn set_output<T: Any + Send + Sync>(&self, idx: usize, value: T) {
        self.outputs[idx].write().set(value);
    }
}
