//! Serializable net and operator definitions.
//!
//! Definitions are plain data: a [`NetDef`] lists [`OperatorDef`]s, and operator
//! arguments may themselves embed whole nets (`then_net`/`else_net` of `If`). They can be
//! stored as JSON or bincode and are only read while nets are being created.

mod argument;

use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use argument::{ArgumentHelper, RepeatedArgument, SingleArgument};

use crate::context::DeviceOption;

/// Value payload of a named operator argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgValue {
    Float(f32),
    Int(i64),
    Str(String),
    Net(NetDef),
    Floats(Vec<f32>),
    Ints(Vec<i64>),
    Strs(Vec<String>),
    Nets(Vec<NetDef>),
}

impl ArgValue {
    /// Short name of the value kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            ArgValue::Float(_) => "float",
            ArgValue::Int(_) => "int",
            ArgValue::Str(_) => "string",
            ArgValue::Net(_) => "net",
            ArgValue::Floats(_) => "floats",
            ArgValue::Ints(_) => "ints",
            ArgValue::Strs(_) => "strings",
            ArgValue::Nets(_) => "nets",
        }
    }
}

/// Named argument attached to an operator or net definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    pub name: String,
    pub value: ArgValue,
}

impl Argument {
    pub fn new(name: impl Into<String>, value: ArgValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Declarative description of one operator instance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OperatorDef {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub op_type: String,
    #[serde(default)]
    pub input: Vec<String>,
    #[serde(default)]
    pub output: Vec<String>,
    #[serde(default)]
    pub arg: Vec<Argument>,
    #[serde(default)]
    pub device_option: Option<DeviceOption>,
}

impl OperatorDef {
    pub fn new(op_type: impl Into<String>) -> Self {
        Self {
            op_type: op_type.into(),
            ..Self::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn input(mut self, blob: impl Into<String>) -> Self {
        self.input.push(blob.into());
        self
    }

    pub fn output(mut self, blob: impl Into<String>) -> Self {
        self.output.push(blob.into());
        self
    }

    pub fn arg(mut self, name: impl Into<String>, value: ArgValue) -> Self {
        self.arg.push(Argument::new(name, value));
        self
    }

    pub fn device(mut self, option: DeviceOption) -> Self {
        self.device_option = Some(option);
        self
    }

    /// Name used in diagnostics: the instance name when set, otherwise the type.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.op_type
        } else {
            &self.name
        }
    }
}

/// Declarative description of a net: an ordered list of operators plus metadata.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NetDef {
    #[serde(default)]
    pub name: String,
    /// Executor kind; empty selects the sequential executor.
    #[serde(rename = "type", default)]
    pub net_type: String,
    #[serde(default)]
    pub op: Vec<OperatorDef>,
    #[serde(default)]
    pub external_input: Vec<String>,
    #[serde(default)]
    pub external_output: Vec<String>,
    #[serde(default)]
    pub device_option: Option<DeviceOption>,
    #[serde(default)]
    pub arg: Vec<Argument>,
}

#[derive(Debug, Error)]
pub enum DefinitionSerdeError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("bincode error: {0}")]
    Bincode(#[from] bincode::Error),
}

#[derive(Debug, Error)]
pub enum DefinitionIoError {
    #[error(transparent)]
    Serialization(#[from] DefinitionSerdeError),
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

impl NetDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, net_type: impl Into<String>) -> Self {
        self.net_type = net_type.into();
        self
    }

    pub fn with_op(mut self, op: OperatorDef) -> Self {
        self.op.push(op);
        self
    }

    pub fn with_external_input(mut self, blob: impl Into<String>) -> Self {
        self.external_input.push(blob.into());
        self
    }

    pub fn with_external_output(mut self, blob: impl Into<String>) -> Self {
        self.external_output.push(blob.into());
        self
    }

    pub fn with_device(mut self, option: DeviceOption) -> Self {
        self.device_option = Some(option);
        self
    }

    pub fn to_json_string(&self) -> Result<String, DefinitionSerdeError> {
        serde_json::to_string_pretty(self).map_err(DefinitionSerdeError::from)
    }

    pub fn from_json_str(src: &str) -> Result<Self, DefinitionSerdeError> {
        serde_json::from_str(src).map_err(DefinitionSerdeError::from)
    }

    pub fn to_bincode_bytes(&self) -> Result<Vec<u8>, DefinitionSerdeError> {
        bincode::serialize(self).map_err(DefinitionSerdeError::from)
    }

    pub fn from_bincode_slice(bytes: &[u8]) -> Result<Self, DefinitionSerdeError> {
        bincode::deserialize(bytes).map_err(DefinitionSerdeError::from)
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), DefinitionIoError> {
        let contents = self.to_json_string()?;
        fs::write(path, contents).map_err(DefinitionIoError::from)
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, DefinitionIoError> {
        let contents = fs::read_to_string(path).map_err(DefinitionIoError::from)?;
        NetDef::from_json_str(&contents).map_err(DefinitionIoError::from)
    }

    pub fn save_bincode<P: AsRef<Path>>(&self, path: P) -> Result<(), DefinitionIoError> {
        let bytes = self.to_bincode_bytes()?;
        fs::write(path, bytes).map_err(DefinitionIoError::from)
    }

    pub fn load_bincode<P: AsRef<Path>>(path: P) -> Result<Self, DefinitionIoError> {
        let bytes = fs::read(path).map_err(DefinitionIoError::from)?;
        NetDef::from_bincode_slice(&bytes).map_err(DefinitionIoError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn if_net() -> NetDef {
        let then_net = NetDef::new("then").with_op(
            OperatorDef::new("ConstantFill")
                .output("x")
                .arg("value", ArgValue::Float(1.0)),
        );
        NetDef::new("main")
            .with_external_input("cond")
            .with_op(
                OperatorDef::new("If")
                    .input("cond")
                    .arg("then_net", ArgValue::Net(then_net)),
            )
    }

    #[test]
    fn json_uses_type_field_and_nested_nets() -> Result<(), DefinitionSerdeError> {
        let json = if_net().to_json_string()?;
        assert!(json.contains("\"type\": \"If\""));
        assert!(json.contains("\"net\""));
        assert_eq!(NetDef::from_json_str(&json)?, if_net());
        Ok(())
    }

    #[test]
    fn json_fills_defaults() -> Result<(), DefinitionSerdeError> {
        let net = NetDef::from_json_str(
            r#"{ "op": [ { "type": "Copy", "input": ["a"], "output": ["b"] } ] }"#,
        )?;
        assert_eq!(net.net_type, "");
        assert_eq!(net.op[0].op_type, "Copy");
        assert!(net.op[0].arg.is_empty());
        assert!(net.device_option.is_none());
        Ok(())
    }

    #[test]
    fn bincode_preserves_nested_nets() -> Result<(), DefinitionSerdeError> {
        let bytes = if_net().to_bincode_bytes()?;
        assert_eq!(NetDef::from_bincode_slice(&bytes)?, if_net());
        Ok(())
    }

    #[test]
    fn display_name_falls_back_to_type() {
        assert_eq!(OperatorDef::new("If").display_name(), "If");
        assert_eq!(OperatorDef::new("If").named("branch").display_name(), "branch");
    }
}
