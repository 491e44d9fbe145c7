//! Host-backed tensor stored in workspace blobs by the reference CPU context.

use anyhow::{bail, ensure, Result};
use rand::Rng;

use super::dtype::DType;
use super::shape::Shape;
use super::storage::{Element, TensorData};

/// Comparison applied element-wise by [`Tensor::compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Less,
    Greater,
    Equal,
}

/// Simple host-backed tensor: a shape plus a typed dense buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: Shape,
    data: TensorData,
}

impl Tensor {
    /// Wraps an existing buffer, validating its length against the shape.
    pub fn from_data(shape: Shape, data: TensorData) -> Result<Self> {
        if data.len() != shape.num_elements() {
            bail!(
                "tensor data length ({}) does not match shape {}",
                data.len(),
                shape
            );
        }
        Ok(Tensor { shape, data })
    }

    /// Constructs an `F32` tensor from raw values.
    pub fn from_vec(shape: Shape, data: Vec<f32>) -> Result<Self> {
        Self::from_data(shape, TensorData::F32(data))
    }

    /// Constructs an `I32` tensor from raw values.
    pub fn from_i32(shape: Shape, data: Vec<i32>) -> Result<Self> {
        Self::from_data(shape, TensorData::I32(data))
    }

    /// Constructs an `I64` tensor from raw values.
    pub fn from_i64(shape: Shape, data: Vec<i64>) -> Result<Self> {
        Self::from_data(shape, TensorData::I64(data))
    }

    /// Constructs a `Bool` tensor from raw values.
    pub fn from_bool(shape: Shape, data: Vec<bool>) -> Result<Self> {
        Self::from_data(shape, TensorData::Bool(data))
    }

    /// Rank-0 boolean tensor, the canonical `If` condition.
    pub fn scalar_bool(value: bool) -> Self {
        Tensor {
            shape: Shape::scalar(),
            data: TensorData::Bool(vec![value]),
        }
    }

    /// Returns a tensor of `shape` filled with `value` converted into `dtype`.
    pub fn full(shape: Shape, dtype: DType, value: f64) -> Self {
        let data = TensorData::filled(dtype, shape.num_elements(), value);
        Tensor { shape, data }
    }

    /// Returns a zero-initialized tensor of the requested shape and dtype.
    pub fn zeros(shape: Shape, dtype: DType) -> Self {
        Self::full(shape, dtype, 0.0)
    }

    /// Samples an `F32` tensor uniformly from `[min, max)`.
    pub fn uniform(shape: Shape, min: f32, max: f32, rng: &mut impl Rng) -> Result<Self> {
        ensure!(
            min < max,
            "uniform range is empty: min ({min}) must be below max ({max})"
        );
        let values = (0..shape.num_elements())
            .map(|_| rng.gen_range(min..max))
            .collect();
        Ok(Tensor {
            shape,
            data: TensorData::F32(values),
        })
    }

    /// Returns the total number of elements stored in the tensor.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Reports whether the tensor contains zero elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    /// Borrows the payload as `T`, failing when the dtype differs.
    pub fn data<T: Element>(&self) -> Result<&[T]> {
        match T::slice(&self.data) {
            Some(values) => Ok(values),
            None => bail!(
                "tensor holds {} elements, requested {}",
                self.dtype().name(),
                T::DTYPE.name()
            ),
        }
    }

    /// Element-wise sum of two numeric tensors with identical shape and dtype.
    pub fn add(&self, rhs: &Tensor) -> Result<Tensor> {
        self.ensure_same_layout(rhs, "add")?;
        let data = match (&self.data, &rhs.data) {
            (TensorData::F32(a), TensorData::F32(b)) => {
                TensorData::F32(zip_map(a, b, |x, y| x + y))
            }
            (TensorData::I32(a), TensorData::I32(b)) => {
                TensorData::I32(zip_map(a, b, i32::wrapping_add))
            }
            (TensorData::I64(a), TensorData::I64(b)) => {
                TensorData::I64(zip_map(a, b, i64::wrapping_add))
            }
            _ => bail!("add is not defined for dtype {}", self.dtype().name()),
        };
        Ok(Tensor {
            shape: self.shape.clone(),
            data,
        })
    }

    /// Element-wise negation of a boolean tensor.
    pub fn logical_not(&self) -> Result<Tensor> {
        let values = self.data::<bool>()?;
        Ok(Tensor {
            shape: self.shape.clone(),
            data: TensorData::Bool(values.iter().map(|v| !v).collect()),
        })
    }

    /// Element-wise comparison producing a boolean tensor.
    pub fn compare(&self, rhs: &Tensor, op: ComparisonOp) -> Result<Tensor> {
        self.ensure_same_layout(rhs, "compare")?;
        let values = match (&self.data, &rhs.data) {
            (TensorData::Bool(a), TensorData::Bool(b)) => zip_map(a, b, predicate(op)),
            (TensorData::F32(a), TensorData::F32(b)) => zip_map(a, b, predicate(op)),
            (TensorData::I32(a), TensorData::I32(b)) => zip_map(a, b, predicate(op)),
            (TensorData::I64(a), TensorData::I64(b)) => zip_map(a, b, predicate(op)),
            _ => bail!("compare operands must share a dtype"),
        };
        Ok(Tensor {
            shape: self.shape.clone(),
            data: TensorData::Bool(values),
        })
    }

    fn ensure_same_layout(&self, rhs: &Tensor, op: &str) -> Result<()> {
        ensure!(
            self.shape == rhs.shape,
            "{op}: shape mismatch {} vs {}",
            self.shape,
            rhs.shape
        );
        ensure!(
            self.dtype() == rhs.dtype(),
            "{op}: dtype mismatch {} vs {}",
            self.dtype().name(),
            rhs.dtype().name()
        );
        Ok(())
    }
}

fn zip_map<T: Copy, U>(lhs: &[T], rhs: &[T], f: impl Fn(T, T) -> U) -> Vec<U> {
    lhs.iter().zip(rhs).map(|(&a, &b)| f(a, b)).collect()
}

fn predicate<T: PartialOrd>(op: ComparisonOp) -> impl Fn(T, T) -> bool {
    move |a: T, b: T| match op {
        ComparisonOp::Less => a < b,
        ComparisonOp::Greater => a > b,
        ComparisonOp::Equal => a == b,
    }
}
