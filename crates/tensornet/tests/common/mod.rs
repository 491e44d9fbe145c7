#![allow(dead_code)]

use std::sync::Arc;

use tensornet::config::ExecutorConfig;
use tensornet::definition::{ArgValue, NetDef, OperatorDef};
use tensornet::error::OperatorResult;
use tensornet::operator::{register, CreateOperator, OpSchema, Operator, OperatorBase};
use tensornet::tensor::{Shape, Tensor};
use tensornet::workspace::Workspace;

/// Increments the i64 scalar stored in its output, starting from 1.
pub struct CountRunsOp {
    base: OperatorBase,
}

impl CreateOperator for CountRunsOp {
    fn create(
        def: &OperatorDef,
        ws: &Arc<Workspace>,
        _config: &ExecutorConfig,
    ) -> OperatorResult<Self> {
        Ok(Self {
            base: OperatorBase::new(def, ws)?,
        })
    }
}

impl Operator for CountRunsOp {
    fn op_type(&self) -> &str {
        self.base.op_type()
    }

    fn name(&self) -> &str {
        self.base.name()
    }

    fn run(&mut self) -> OperatorResult<bool> {
        let mut blob = self.base.output(0).write();
        let previous = blob
            .get::<Tensor>()
            .and_then(|tensor| tensor.data::<i64>().ok().map(|values| values[0]))
            .unwrap_or(0);
        let next = Tensor::from_i64(Shape::scalar(), vec![previous + 1]).expect("scalar counter");
        blob.set(next);
        Ok(true)
    }
}

/// Always reports an ordinary failure.
pub struct FailOp {
    base: OperatorBase,
}

impl CreateOperator for FailOp {
    fn create(
        def: &OperatorDef,
        ws: &Arc<Workspace>,
        _config: &ExecutorConfig,
    ) -> OperatorResult<Self> {
        Ok(Self {
            base: OperatorBase::new(def, ws)?,
        })
    }
}

impl Operator for FailOp {
    fn op_type(&self) -> &str {
        self.base.op_type()
    }

    fn name(&self) -> &str {
        self.base.name()
    }

    fn run(&mut self) -> OperatorResult<bool> {
        Ok(false)
    }
}

/// Fresh workspace with the CPU operators and the test helpers registered.
pub fn workspace() -> Arc<Workspace> {
    tensornet_backend_ref_cpu::register_cpu_operators();
    register::<CountRunsOp>("cpu", "CountRuns", OpSchema::new().num_outputs(1));
    register::<FailOp>("cpu", "Fail", OpSchema::new());
    Workspace::shared()
}

pub fn count_runs(blob: &str) -> OperatorDef {
    OperatorDef::new("CountRuns")
        .named(format!("count_{blob}"))
        .output(blob)
}

pub fn fail() -> OperatorDef {
    OperatorDef::new("Fail")
}

/// Net made of the given operators, with no declared externals.
pub fn net(name: &str, ops: impl IntoIterator<Item = OperatorDef>) -> NetDef {
    ops.into_iter().fold(NetDef::new(name), NetDef::with_op)
}

pub fn if_op(condition: &str, then_net: NetDef, else_net: Option<NetDef>) -> OperatorDef {
    let op = OperatorDef::new("If")
        .input(condition)
        .arg("then_net", ArgValue::Net(then_net));
    match else_net {
        Some(else_net) => op.arg("else_net", ArgValue::Net(else_net)),
        None => op,
    }
}

pub fn bool_fill(blob: &str, value: bool) -> OperatorDef {
    OperatorDef::new("ConstantFill")
        .output(blob)
        .arg("dtype", ArgValue::Str("bool".into()))
        .arg("value", ArgValue::Int(i64::from(value)))
}

/// Times the CountRuns op writing `blob` has run; 0 when it never ran.
pub fn runs(ws: &Workspace, blob: &str) -> i64 {
    ws.fetch_blob::<Tensor>(blob)
        .and_then(|tensor| tensor.data::<i64>().ok().map(|values| values[0]))
        .unwrap_or(0)
}
