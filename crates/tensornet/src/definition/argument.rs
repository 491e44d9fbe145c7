//! Typed access to operator arguments.

use std::collections::HashMap;

use super::{ArgValue, Argument, NetDef, OperatorDef};
use crate::error::{OperatorError, OperatorResult};

/// Types that can be read from a single-valued argument.
pub trait SingleArgument: Sized {
    fn from_arg(value: &ArgValue) -> Option<Self>;
}

/// Types that can be read from a repeated argument.
pub trait RepeatedArgument: Sized {
    fn from_args(value: &ArgValue) -> Option<Vec<Self>>;
}

impl SingleArgument for f32 {
    fn from_arg(value: &ArgValue) -> Option<Self> {
        match value {
            ArgValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl SingleArgument for i64 {
    fn from_arg(value: &ArgValue) -> Option<Self> {
        match value {
            ArgValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl SingleArgument for i32 {
    fn from_arg(value: &ArgValue) -> Option<Self> {
        i64::from_arg(value).and_then(|v| i32::try_from(v).ok())
    }
}

impl SingleArgument for usize {
    fn from_arg(value: &ArgValue) -> Option<Self> {
        i64::from_arg(value).and_then(|v| usize::try_from(v).ok())
    }
}

impl SingleArgument for bool {
    fn from_arg(value: &ArgValue) -> Option<Self> {
        match value {
            ArgValue::Int(0) => Some(false),
            ArgValue::Int(1) => Some(true),
            _ => None,
        }
    }
}

impl SingleArgument for String {
    fn from_arg(value: &ArgValue) -> Option<Self> {
        match value {
            ArgValue::Str(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl SingleArgument for NetDef {
    fn from_arg(value: &ArgValue) -> Option<Self> {
        match value {
            ArgValue::Net(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl RepeatedArgument for f32 {
    fn from_args(value: &ArgValue) -> Option<Vec<Self>> {
        match value {
            ArgValue::Floats(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl RepeatedArgument for i64 {
    fn from_args(value: &ArgValue) -> Option<Vec<Self>> {
        match value {
            ArgValue::Ints(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl RepeatedArgument for usize {
    fn from_args(value: &ArgValue) -> Option<Vec<Self>> {
        match value {
            ArgValue::Ints(v) => v.iter().map(|&d| usize::try_from(d).ok()).collect(),
            _ => None,
        }
    }
}

impl RepeatedArgument for String {
    fn from_args(value: &ArgValue) -> Option<Vec<Self>> {
        match value {
            ArgValue::Strs(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl RepeatedArgument for NetDef {
    fn from_args(value: &ArgValue) -> Option<Vec<Self>> {
        match value {
            ArgValue::Nets(v) => Some(v.clone()),
            _ => None,
        }
    }
}

/// Name-indexed view over an operator definition's arguments.
///
/// Only borrowed while an operator is being constructed; operators keep the values
/// they need, not the definition.
pub struct ArgumentHelper<'a> {
    op: &'a str,
    args: HashMap<&'a str, &'a Argument>,
}

impl<'a> ArgumentHelper<'a> {
    /// Indexes the arguments of `def`, rejecting duplicated names.
    pub fn new(def: &'a OperatorDef) -> OperatorResult<Self> {
        let mut args = HashMap::with_capacity(def.arg.len());
        for arg in &def.arg {
            if args.insert(arg.name.as_str(), arg).is_some() {
                return Err(OperatorError::configuration(
                    def.display_name(),
                    format!("duplicated argument name '{}'", arg.name),
                ));
            }
        }
        Ok(Self {
            op: def.display_name(),
            args,
        })
    }

    pub fn has_argument(&self, name: &str) -> bool {
        self.args.contains_key(name)
    }

    /// Returns the raw argument value when present.
    pub fn value(&self, name: &str) -> Option<&'a ArgValue> {
        self.args.get(name).map(|arg| &arg.value)
    }

    /// `true` when `name` exists and holds a single value convertible to `T`.
    pub fn has_single_argument_of_type<T: SingleArgument>(&self, name: &str) -> bool {
        self.value(name).and_then(T::from_arg).is_some()
    }

    /// Reads a single-valued argument, falling back to `default` when absent.
    ///
    /// A present argument of the wrong kind is a configuration error rather than a
    /// silent fallback.
    pub fn get_single_argument<T: SingleArgument>(
        &self,
        name: &str,
        default: T,
    ) -> OperatorResult<T> {
        match self.value(name) {
            None => Ok(default),
            Some(value) => T::from_arg(value).ok_or_else(|| self.wrong_kind(name, value)),
        }
    }

    /// Reads a repeated argument; absent arguments yield an empty list.
    pub fn get_repeated_argument<T: RepeatedArgument>(
        &self,
        name: &str,
    ) -> OperatorResult<Vec<T>> {
        match self.value(name) {
            None => Ok(Vec::new()),
            Some(value) => T::from_args(value).ok_or_else(|| self.wrong_kind(name, value)),
        }
    }

    fn wrong_kind(&self, name: &str, value: &ArgValue) -> OperatorError {
        OperatorError::configuration(
            self.op,
            format!("argument '{name}' has unexpected kind '{}'", value.kind()),
        )
    }
}
