//! Typed host storage and the scalar element trait implemented by its variants.

use super::dtype::DType;

/// Dense host payload; the variant determines the tensor dtype.
#[derive(Debug, Clone, PartialEq)]
pub enum TensorData {
    Bool(Vec<bool>),
    F32(Vec<f32>),
    I32(Vec<i32>),
    I64(Vec<i64>),
}

impl TensorData {
    pub fn dtype(&self) -> DType {
        match self {
            TensorData::Bool(_) => DType::Bool,
            TensorData::F32(_) => DType::F32,
            TensorData::I32(_) => DType::I32,
            TensorData::I64(_) => DType::I64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TensorData::Bool(values) => values.len(),
            TensorData::F32(values) => values.len(),
            TensorData::I32(values) => values.len(),
            TensorData::I64(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Builds a buffer of `len` copies of `value` converted into `dtype`.
    pub fn filled(dtype: DType, len: usize, value: f64) -> Self {
        match dtype {
            DType::Bool => TensorData::Bool(vec![bool::from_f64(value); len]),
            DType::F32 => TensorData::F32(vec![f32::from_f64(value); len]),
            DType::I32 => TensorData::I32(vec![i32::from_f64(value); len]),
            DType::I64 => TensorData::I64(vec![i64::from_f64(value); len]),
        }
    }
}

/// Scalar types that can back a [`TensorData`] variant.
pub trait Element: Copy + Send + Sync + PartialOrd + 'static {
    /// Dtype tag of the matching storage variant.
    const DTYPE: DType;

    /// Borrows the payload when the storage variant matches.
    fn slice(data: &TensorData) -> Option<&[Self]>;

    /// Converts a fill value; booleans treat any non-zero value as `true`.
    fn from_f64(value: f64) -> Self;
}

macro_rules! impl_element {
    ($ty:ty, $variant:ident, $dtype:expr, |$v:ident| $convert:expr) => {
        impl Element for $ty {
            const DTYPE: DType = $dtype;

            fn slice(data: &TensorData) -> Option<&[Self]> {
                match data {
                    TensorData::$variant(values) => Some(values.as_slice()),
                    _ => None,
                }
            }

            fn from_f64($v: f64) -> Self {
                $convert
            }
        }
    };
}

impl_element!(bool, Bool, DType::Bool, |v| v != 0.0);
impl_element!(f32, F32, DType::F32, |v| v as f32);
impl_element!(i32, I32, DType::I32, |v| v as i32);
impl_element!(i64, I64, DType::I64, |v| v as i64);
