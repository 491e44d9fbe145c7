//! Error types surfaced while building and running operator graphs.

use thiserror::Error;

/// Convenience alias for results returned by operators and nets.
pub type OperatorResult<T> = Result<T, OperatorError>;

/// Failures raised by operator construction, validation, and execution.
///
/// A sub-graph reporting `Ok(false)` is not an error; it is propagated as a plain
/// boolean by the enclosing operator.
#[derive(Debug, Error)]
pub enum OperatorError {
    /// A required argument is missing or has the wrong shape/kind.
    #[error("{op}: {message}")]
    Configuration { op: String, message: String },

    /// A nested net could not be compiled.
    #[error("{op}: {message}: {source}")]
    Initialization {
        op: String,
        message: String,
        #[source]
        source: Box<OperatorError>,
    },

    /// An input blob does not hold the expected tensor type or dtype.
    #[error("{op}: {message} (expected {expected}, found {actual})")]
    Type {
        op: String,
        message: String,
        expected: String,
        actual: String,
    },

    /// An input tensor does not have the expected number of elements.
    #[error("{op}: {message} (expected {expected}, found {actual})")]
    Shape {
        op: String,
        message: String,
        expected: String,
        actual: String,
    },

    #[error("no operator '{op_type}' registered for device '{device}'")]
    UnknownOperator { op_type: String, device: String },

    #[error("{op}: encountered a non-existing input blob '{blob}'")]
    MissingBlob { op: String, blob: String },

    #[error("net '{net}' has unsupported type '{net_type}'")]
    UnsupportedNetType { net: String, net_type: String },

    #[error("failed to create context for device '{device}': {reason}")]
    Context { device: String, reason: String },

    /// A kernel failed while computing an operator's outputs.
    #[error("{op}: execution failed: {source}")]
    Execution {
        op: String,
        #[source]
        source: anyhow::Error,
    },
}

impl OperatorError {
    pub fn configuration(op: impl Into<String>, message: impl Into<String>) -> Self {
        OperatorError::Configuration {
            op: op.into(),
            message: message.into(),
        }
    }

    pub fn initialization(
        op: impl Into<String>,
        message: impl Into<String>,
        source: OperatorError,
    ) -> Self {
        OperatorError::Initialization {
            op: op.into(),
            message: message.into(),
            source: Box::new(source),
        }
    }

    pub fn type_mismatch(
        op: impl Into<String>,
        message: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        OperatorError::Type {
            op: op.into(),
            message: message.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn shape_mismatch(
        op: impl Into<String>,
        message: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        OperatorError::Shape {
            op: op.into(),
            message: message.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn execution(op: impl Into<String>, source: anyhow::Error) -> Self {
        OperatorError::Execution {
            op: op.into(),
            source,
        }
    }

    /// Stable short name of the error category, handy for logs and assertions.
    pub fn kind(&self) -> &'static str {
        match self {
            OperatorError::Configuration { .. } => "configuration",
            OperatorError::Initialization { .. } => "initialization",
            OperatorError::Type { .. } => "type",
            OperatorError::Shape { .. } => "shape",
            OperatorError::UnknownOperator { .. } => "unknown_operator",
            OperatorError::MissingBlob { .. } => "missing_blob",
            OperatorError::UnsupportedNetType { .. } => "unsupported_net_type",
            OperatorError::Context { .. } => "context",
            OperatorError::Execution { .. } => "execution",
        }
    }
}
