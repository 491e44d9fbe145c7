//! Enumerates the scalar element types a tensor blob can carry.

use serde::{Deserialize, Serialize};

/// Logical dtype identifier shared between host tensors and context tensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    /// Boolean predicate, one byte per element.
    Bool,
    /// 32-bit floating point following IEEE-754 semantics.
    F32,
    /// 32-bit signed integer.
    I32,
    /// 64-bit signed integer, used for indices and counters.
    I64,
}

impl DType {
    /// Returns the number of bytes required per scalar element.
    pub fn size_in_bytes(self) -> usize {
        match self {
            DType::Bool => 1,
            DType::F32 | DType::I32 => 4,
            DType::I64 => 8,
        }
    }

    /// Canonical name used in operator arguments (`dtype: "float"`).
    pub fn name(self) -> &'static str {
        match self {
            DType::Bool => "bool",
            DType::F32 => "float",
            DType::I32 => "int32",
            DType::I64 => "int64",
        }
    }

    /// Parses a dtype name as accepted by fill operators.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "bool" => Some(DType::Bool),
            "float" | "f32" | "float32" => Some(DType::F32),
            "int32" | "i32" | "int" => Some(DType::I32),
            "int64" | "i64" | "long" => Some(DType::I64),
            _ => None,
        }
    }
}
