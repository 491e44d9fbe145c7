//! Execution contexts that operators are generic over.
//!
//! A context owns whatever device state an operator needs (streams, handles) and names
//! the tensor type its operators store in workspace blobs. Dispatch logic never special
//! cases a device; it only talks to the [`Context`] trait.

use serde::{Deserialize, Serialize};

use crate::env;
use crate::error::OperatorResult;
use crate::tensor::{DType, Shape, Tensor};

/// Placement requested by an operator or net definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceOption {
    pub device_type: String,
    #[serde(default)]
    pub device_id: u32,
}

impl DeviceOption {
    pub fn new(device_type: impl Into<String>) -> Self {
        Self {
            device_type: device_type.into(),
            device_id: 0,
        }
    }

    pub fn with_device_id(mut self, device_id: u32) -> Self {
        self.device_id = device_id;
        self
    }
}

impl Default for DeviceOption {
    fn default() -> Self {
        Self::new(env::default_device())
    }
}

/// Metadata every context tensor exposes so operators can validate inputs
/// without copying them to the host.
pub trait ContextTensor: Clone + Send + Sync + 'static {
    fn dtype(&self) -> DType;

    fn shape(&self) -> &Shape;

    fn len(&self) -> usize {
        self.shape().num_elements()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ContextTensor for Tensor {
    fn dtype(&self) -> DType {
        Tensor::dtype(self)
    }

    fn shape(&self) -> &Shape {
        Tensor::shape(self)
    }

    fn len(&self) -> usize {
        Tensor::len(self)
    }
}

/// Device abstraction operators are parameterised over.
pub trait Context: Send + Sized + 'static {
    /// Tensor type stored in blobs by operators running on this context.
    type Tensor: ContextTensor;

    /// Device name used as the operator registry key (e.g. `"cpu"`).
    const DEVICE: &'static str;

    /// Creates a context for the requested placement.
    fn new(option: &DeviceOption) -> OperatorResult<Self>;

    /// Allocates a context tensor holding a copy of `tensor`.
    fn copy_from_host(&self, tensor: &Tensor) -> anyhow::Result<Self::Tensor>;

    /// Reads a context tensor back into host memory.
    fn copy_to_host(&self, tensor: &Self::Tensor) -> anyhow::Result<Tensor>;

    /// Makes this context current before an operator body runs.
    fn switch_to_device(&self) {}

    /// Waits for queued device work; `false` reports an asynchronous failure.
    fn finish_device_computation(&self) -> bool {
        true
    }
}
