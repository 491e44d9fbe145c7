//! Built-in operators, generic over the execution [`Context`].
//!
//! Backends make these available on their device with
//! [`register_builtin_operators`].

pub mod control_flow;
pub mod elementwise;
pub mod fill;

pub use control_flow::IfOp;
pub use elementwise::{AddOp, CompareOp, CopyOp, NotOp};
pub use fill::{ConstantFillOp, UniformFillOp};

use crate::context::Context;
use crate::error::{OperatorError, OperatorResult};
use crate::operator::{register, OpSchema, OperatorBase};
use crate::tensor::Tensor;

/// Registers every built-in operator for `C` under `C::DEVICE`.
pub fn register_builtin_operators<C: Context>() {
    let device = C::DEVICE;
    let fill = OpSchema::new().num_inputs(0).num_outputs(1);
    let unary = OpSchema::new().num_inputs(1).num_outputs(1);
    let binary = OpSchema::new().num_inputs(2).num_outputs(1);

    register::<ConstantFillOp<C>>(device, "ConstantFill", fill);
    register::<UniformFillOp<C>>(device, "UniformFill", fill);
    register::<CopyOp<C>>(device, "Copy", unary);
    register::<NotOp<C>>(device, "Not", unary);
    register::<AddOp<C>>(device, "Add", binary);
    for op_type in ["LT", "GT", "EQ"] {
        register::<CompareOp<C>>(device, op_type, binary);
    }
    register::<IfOp<C>>(
        device,
        "If",
        OpSchema::new().inputs_between(1, usize::MAX),
    );
    tracing::debug!(device, "registered built-in operators");
}

/// Reads input `idx` back into host memory.
pub(crate) fn host_input<C: Context>(
    base: &OperatorBase,
    context: &C,
    idx: usize,
) -> OperatorResult<Tensor> {
    let tensor = base.input_tensor::<C::Tensor>(idx)?;
    context
        .copy_to_host(&tensor)
        .map_err(|err| OperatorError::execution(base.name(), err))
}

/// Copies a host tensor onto the context and stores it in output `idx`.
pub(crate) fn store_output<C: Context>(
    base: &OperatorBase,
    context: &C,
    idx: usize,
    tensor: &Tensor,
) -> OperatorResult<()> {
    let value = context
        .copy_from_host(tensor)
        .map_err(|err| OperatorError::execution(base.name(), err))?;
    base.set_output(idx, value);
    Ok(())
}
