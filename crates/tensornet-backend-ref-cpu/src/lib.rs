//! Reference CPU context for tensornet.
//!
//! Linking this crate registers the built-in operators for the `"cpu"` device.

mod context;

pub use context::CpuContext;

/// Register the built-in operators for the `"cpu"` device.
///
/// Runs automatically before the first registry lookup, but can be called manually;
/// registering again replaces the entries with identical ones.
pub fn register_cpu_operators() {
    tensornet::ops::register_builtin_operators::<CpuContext>();
}

#[tensornet::linkme::distributed_slice(tensornet::operator::OPERATOR_REGISTRARS)]
#[linkme(crate = tensornet::linkme)]
static REGISTER_CPU_OPERATORS: fn() = register_cpu_operators;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_builtin_operators() {
        register_cpu_operators();
        let ops = tensornet::operator::registered_operators("cpu");
        for op_type in [
            "Add",
            "ConstantFill",
            "Copy",
            "EQ",
            "GT",
            "If",
            "LT",
            "Not",
            "UniformFill",
        ] {
            assert!(ops.contains(&op_type.to_string()), "{op_type} missing");
        }
    }
}
