//! Control-flow operators that run nested nets.

mod if_op;

pub use if_op::{IfOp, ELSE_NET_ARG, THEN_NET_ARG};
