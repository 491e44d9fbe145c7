use std::sync::Arc;

use super::{host_input, store_output};
use crate::config::ExecutorConfig;
use crate::context::Context;
use crate::definition::OperatorDef;
use crate::error::{OperatorError, OperatorResult};
use crate::operator::{CreateOperator, DeviceOperator, OperatorBase};
use crate::tensor::{ComparisonOp, Tensor};
use crate::workspace::Workspace;

macro_rules! device_operator_accessors {
    () => {
        type Context = C;

        fn base(&self) -> &OperatorBase {
            &self.base
        }

        fn context(&self) -> &C {
            &self.context
        }
    };
}

/// Copies its input tensor into its output blob.
pub struct CopyOp<C: Context> {
    base: OperatorBase,
    context: C,
}

impl<C: Context> CreateOperator for CopyOp<C> {
    fn create(
        def: &OperatorDef,
        ws: &Arc<Workspace>,
        _config: &ExecutorConfig,
    ) -> OperatorResult<Self> {
        let base = OperatorBase::new(def, ws)?;
        let context = C::new(base.device_option())?;
        Ok(Self { base, context })
    }
}

impl<C: Context> DeviceOperator for CopyOp<C> {
    device_operator_accessors!();

    fn run_on_device(&mut self) -> OperatorResult<bool> {
        let tensor = self.base.input_tensor::<C::Tensor>(0)?;
        self.base.set_output(0, tensor);
        Ok(true)
    }
}

/// Elementwise sum of two tensors with identical shape and dtype.
pub struct AddOp<C: Context> {
    base: OperatorBase,
    context: C,
}

impl<C: Context> CreateOperator for AddOp<C> {
    fn create(
        def: &OperatorDef,
        ws: &Arc<Workspace>,
        _config: &ExecutorConfig,
    ) -> OperatorResult<Self> {
        let base = OperatorBase::new(def, ws)?;
        let context = C::new(base.device_option())?;
        Ok(Self { base, context })
    }
}

impl<C: Context> DeviceOperator for AddOp<C> {
    device_operator_accessors!();

    fn run_on_device(&mut self) -> OperatorResult<bool> {
        let lhs = host_input(&self.base, &self.context, 0)?;
        let rhs = host_input(&self.base, &self.context, 1)?;
        let sum = lhs
            .add(&rhs)
            .map_err(|err| OperatorError::execution(self.base.name(), err))?;
        store_output(&self.base, &self.context, 0, &sum)?;
        Ok(true)
    }
}

/// Logical negation of a bool tensor.
pub struct NotOp<C: Context> {
    base: OperatorBase,
    context: C,
}

impl<C: Context> CreateOperator for NotOp<C> {
    fn create(
        def: &OperatorDef,
        ws: &Arc<Workspace>,
        _config: &ExecutorConfig,
    ) -> OperatorResult<Self> {
        let base = OperatorBase::new(def, ws)?;
        let context = C::new(base.device_option())?;
        Ok(Self { base, context })
    }
}

impl<C: Context> DeviceOperator for NotOp<C> {
    device_operator_accessors!();

    fn run_on_device(&mut self) -> OperatorResult<bool> {
        let input = host_input(&self.base, &self.context, 0)?;
        let negated = input
            .logical_not()
            .map_err(|err| OperatorError::execution(self.base.name(), err))?;
        store_output(&self.base, &self.context, 0, &negated)?;
        Ok(true)
    }
}

/// Elementwise comparison producing a bool tensor.
///
/// The comparison is chosen by the operator type: `LT`, `GT` or `EQ`.
pub struct CompareOp<C: Context> {
    base: OperatorBase,
    context: C,
    op: ComparisonOp,
}

impl<C: Context> CreateOperator for CompareOp<C> {
    fn create(
        def: &OperatorDef,
        ws: &Arc<Workspace>,
        _config: &ExecutorConfig,
    ) -> OperatorResult<Self> {
        let op = match def.op_type.as_str() {
            "LT" => ComparisonOp::Less,
            "GT" => ComparisonOp::Greater,
            "EQ" => ComparisonOp::Equal,
            other => {
                return Err(OperatorError::configuration(
                    def.display_name(),
                    format!("'{other}' is not a comparison operator"),
                ))
            }
        };
        let base = OperatorBase::new(def, ws)?;
        let context = C::new(base.device_option())?;
        Ok(Self { base, context, op })
    }
}

impl<C: Context> DeviceOperator for CompareOp<C> {
    device_operator_accessors!();

    fn run_on_device(&mut self) -> OperatorResult<bool> {
        let lhs = host_input(&self.base, &self.context, 0)?;
        let rhs = host_input(&self.base, &self.context, 1)?;
        let result: Tensor = lhs
            .compare(&rhs, self.op)
            .map_err(|err| OperatorError::execution(self.base.name(), err))?;
        store_output(&self.base, &self.context, 0, &result)?;
        Ok(true)
    }
}
