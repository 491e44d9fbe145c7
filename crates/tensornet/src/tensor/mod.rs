//! Core tensor abstractions stored in workspace blobs.
//!
//! The tensor module defines shapes, dtypes, typed host storage, and the host tensor
//! used by the reference CPU context. Device contexts may wrap their own tensor types
//! but exchange data with the host through [`Tensor`].

pub mod dtype;
mod host_tensor;
pub mod shape;
pub mod storage;

pub use dtype::DType;
pub use host_tensor::{ComparisonOp, Tensor};
pub use shape::Shape;
pub use storage::{Element, TensorData};
