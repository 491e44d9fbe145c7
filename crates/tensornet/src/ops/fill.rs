use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::store_output;
use crate::config::ExecutorConfig;
use crate::context::Context;
use crate::definition::{ArgValue, ArgumentHelper, OperatorDef};
use crate::error::{OperatorError, OperatorResult};
use crate::operator::{CreateOperator, DeviceOperator, OperatorBase};
use crate::tensor::{DType, Shape, Tensor};
use crate::workspace::Workspace;

/// Reads the `shape` argument, rejecting shapes whose buffer could not be allocated.
fn fill_shape(
    base: &OperatorBase,
    args: &ArgumentHelper<'_>,
    dtype: DType,
) -> OperatorResult<Shape> {
    let shape = Shape::new(args.get_repeated_argument::<usize>("shape")?);
    let bytes = shape
        .checked_num_elements()
        .and_then(|elements| elements.checked_mul(dtype.size_in_bytes()))
        .filter(|&bytes| bytes <= isize::MAX as usize);
    match bytes {
        Some(_) => Ok(shape),
        None => Err(OperatorError::configuration(
            base.name(),
            format!("shape {shape} is too large for a {} tensor", dtype.name()),
        )),
    }
}

/// Writes a tensor of the given `shape` filled with `value`.
///
/// Arguments: `shape` (ints, empty for a scalar), `value` (float or int, default 0) and
/// `dtype` (`float`, `int32`, `int64` or `bool`; default `float`).
pub struct ConstantFillOp<C: Context> {
    base: OperatorBase,
    context: C,
    value: Tensor,
}

impl<C: Context> CreateOperator for ConstantFillOp<C> {
    fn create(
        def: &OperatorDef,
        ws: &Arc<Workspace>,
        _config: &ExecutorConfig,
    ) -> OperatorResult<Self> {
        let base = OperatorBase::new(def, ws)?;
        let context = C::new(base.device_option())?;
        let args = ArgumentHelper::new(def)?;

        let dtype_name = args.get_single_argument("dtype", DType::F32.name().to_string())?;
        let dtype = DType::from_name(&dtype_name).ok_or_else(|| {
            OperatorError::configuration(base.name(), format!("unknown dtype '{dtype_name}'"))
        })?;
        let shape = fill_shape(&base, &args, dtype)?;
        let value = match args.value("value") {
            None => 0.0,
            Some(ArgValue::Float(v)) => f64::from(*v),
            Some(ArgValue::Int(v)) => *v as f64,
            Some(other) => {
                return Err(OperatorError::configuration(
                    base.name(),
                    format!("argument 'value' has unexpected kind '{}'", other.kind()),
                ))
            }
        };

        Ok(Self {
            value: Tensor::full(shape, dtype, value),
            base,
            context,
        })
    }
}

impl<C: Context> DeviceOperator for ConstantFillOp<C> {
    type Context = C;

    fn base(&self) -> &OperatorBase {
        &self.base
    }

    fn context(&self) -> &C {
        &self.context
    }

    fn run_on_device(&mut self) -> OperatorResult<bool> {
        store_output(&self.base, &self.context, 0, &self.value)?;
        Ok(true)
    }
}

/// Writes a float tensor with values drawn uniformly from `[min, max)`.
///
/// Arguments: `shape`, `min` (default 0), `max` (default 1) and an optional `seed`.
pub struct UniformFillOp<C: Context> {
    base: OperatorBase,
    context: C,
    shape: Shape,
    min: f32,
    max: f32,
    rng: StdRng,
}

impl<C: Context> CreateOperator for UniformFillOp<C> {
    fn create(
        def: &OperatorDef,
        ws: &Arc<Workspace>,
        _config: &ExecutorConfig,
    ) -> OperatorResult<Self> {
        let base = OperatorBase::new(def, ws)?;
        let context = C::new(base.device_option())?;
        let args = ArgumentHelper::new(def)?;

        let shape = fill_shape(&base, &args, DType::F32)?;
        let min = args.get_single_argument("min", 0.0f32)?;
        let max = args.get_single_argument("max", 1.0f32)?;
        if min.is_nan() || max.is_nan() || min > max {
            return Err(OperatorError::configuration(
                base.name(),
                format!("min ({min}) must not exceed max ({max})"),
            ));
        }
        let rng = if args.has_argument("seed") {
            let seed: i64 = args.get_single_argument("seed", 0)?;
            StdRng::seed_from_u64(seed as u64)
        } else {
            StdRng::from_entropy()
        };

        Ok(Self {
            base,
            context,
            shape,
            min,
            max,
            rng,
        })
    }
}

impl<C: Context> DeviceOperator for UniformFillOp<C> {
    type Context = C;

    fn base(&self) -> &OperatorBase {
        &self.base
    }

    fn context(&self) -> &C {
        &self.context
    }

    fn run_on_device(&mut self) -> OperatorResult<bool> {
        let tensor = Tensor::uniform(self.shape.clone(), self.min, self.max, &mut self.rng)
            .map_err(|err| OperatorError::execution(self.base.name(), err))?;
        store_output(&self.base, &self.context, 0, &tensor)?;
        Ok(true)
    }
}
