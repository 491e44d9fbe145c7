use tensornet::context::{Context, DeviceOption};
use tensornet::error::{OperatorError, OperatorResult};
use tensornet::tensor::Tensor;

/// Host execution context. Tensors live in process memory, so transfers are clones and
/// there is no device work to wait for.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuContext;

impl Context for CpuContext {
    type Tensor = Tensor;

    const DEVICE: &'static str = "cpu";

    fn new(option: &DeviceOption) -> OperatorResult<Self> {
        if option.device_type != Self::DEVICE {
            return Err(OperatorError::Context {
                device: option.device_type.clone(),
                reason: format!("cpu context cannot run on '{}'", option.device_type),
            });
        }
        Ok(CpuContext)
    }

    fn copy_from_host(&self, tensor: &Tensor) -> anyhow::Result<Tensor> {
        Ok(tensor.clone())
    }

    fn copy_to_host(&self, tensor: &Tensor) -> anyhow::Result<Tensor> {
        Ok(tensor.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_foreign_devices() {
        assert!(CpuContext::new(&DeviceOption::new("cpu")).is_ok());
        let err = CpuContext::new(&DeviceOption::new("cuda")).unwrap_err();
        assert_eq!(err.kind(), "context");
    }
}
