//! Static arity constraints registered alongside each operator constructor.

use crate::definition::OperatorDef;
use crate::error::{OperatorError, OperatorResult};

/// Allowed number of inputs and outputs for an operator type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpSchema {
    min_inputs: usize,
    max_inputs: usize,
    min_outputs: usize,
    max_outputs: usize,
}

impl Default for OpSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl OpSchema {
    /// Schema accepting any number of inputs and outputs.
    pub const fn new() -> Self {
        Self {
            min_inputs: 0,
            max_inputs: usize::MAX,
            min_outputs: 0,
            max_outputs: usize::MAX,
        }
    }

    pub const fn num_inputs(self, n: usize) -> Self {
        self.inputs_between(n, n)
    }

    pub const fn inputs_between(mut self, min: usize, max: usize) -> Self {
        self.min_inputs = min;
        self.max_inputs = max;
        self
    }

    pub const fn num_outputs(self, n: usize) -> Self {
        self.outputs_between(n, n)
    }

    pub const fn outputs_between(mut self, min: usize, max: usize) -> Self {
        self.min_outputs = min;
        self.max_outputs = max;
        self
    }

    /// Checks the definition's arity before the operator is constructed.
    pub fn verify(&self, def: &OperatorDef) -> OperatorResult<()> {
        check_arity(
            def,
            "input",
            def.input.len(),
            self.min_inputs,
            self.max_inputs,
        )?;
        check_arity(
            def,
            "output",
            def.output.len(),
            self.min_outputs,
            self.max_outputs,
        )
    }
}

fn check_arity(
    def: &OperatorDef,
    what: &str,
    actual: usize,
    min: usize,
    max: usize,
) -> OperatorResult<()> {
    if (min..=max).contains(&actual) {
        return Ok(());
    }
    let expected = match (min, max) {
        (min, max) if min == max => format!("{min}"),
        (min, usize::MAX) => format!("at least {min}"),
        (min, max) => format!("between {min} and {max}"),
    };
    Err(OperatorError::configuration(
        def.display_name(),
        format!(
            "operator {} expects {expected} {what}(s), got {actual}",
            def.op_type
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_arity() {
        let schema = OpSchema::new().num_inputs(2).num_outputs(1);
        let ok = OperatorDef::new("Add").input("a").input("b").output("c");
        assert!(schema.verify(&ok).is_ok());

        let err = schema
            .verify(&OperatorDef::new("Add").input("a").output("c"))
            .unwrap_err();
        assert_eq!(err.kind(), "configuration");
        assert!(err.to_string().contains("expects 2 input(s), got 1"));
    }

    #[test]
    fn open_ended_arity() {
        let schema = OpSchema::new().inputs_between(1, usize::MAX);
        assert!(schema.verify(&OperatorDef::new("If").input("c")).is_ok());
        let err = schema.verify(&OperatorDef::new("If")).unwrap_err();
        assert!(err.to_string().contains("at least 1 input(s)"));
    }
}
