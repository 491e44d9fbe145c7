//! Operator-graph executor with nested control flow.
//!
//! Nets ([`definition::NetDef`]) are compiled into runnable operator sequences bound to a
//! shared [`Workspace`]. Operators are registered per device in a global registry and are
//! generic over an execution [`Context`]; backend crates register the built-in set with
//! [`ops::register_builtin_operators`].

pub use linkme;

pub mod config;
pub mod context;
pub mod definition;
mod env;
pub mod error;
pub mod net;
pub mod operator;
pub mod ops;
pub mod tensor;
pub mod workspace;

pub use config::ExecutorConfig;
pub use context::{Context, ContextTensor, DeviceOption};
pub use definition::{ArgValue, Argument, NetDef, OperatorDef};
pub use error::{OperatorError, OperatorResult};
pub use net::{create_net, create_net_with_config, Net};
pub use operator::{create_operator, Operator};
pub use tensor::{DType, Shape, Tensor};
pub use workspace::Workspace;
