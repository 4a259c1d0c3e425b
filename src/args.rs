//! Positional argument definitions.
//!
//! An [`ArgDef`] ties one positional slot of a directive or block to the
//! [`Value`] its text is written into. Ordering rules (no required argument
//! after an optional one, variadic last) are checked by the owning definition
//! when the arguments are attached, not here.

use std::fmt;

use crate::values::{
    BoolValue, BoolsValue, Float32Value, Float64Value, IntValue, IntsValue, StringValue,
    StringsValue, UintValue, UintsValue, Value,
};

/// Declared type of an argument, for display and introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    String,
    Bool,
    Int,
    Uint,
    Float32,
    Float64,
    /// A caller-provided [`Value`] implementation.
    Custom,
}

/// One positional argument slot.
pub struct ArgDef<'a> {
    name: Option<String>,
    target: Box<dyn Value + 'a>,
    value_type: ValueType,
    required: bool,
    variadic: bool,
}

impl<'a> ArgDef<'a> {
    /// A required, single-value argument writing into `target`.
    pub fn new(target: impl Value + 'a, value_type: ValueType) -> Self {
        Self {
            name: None,
            target: Box::new(target),
            value_type,
            required: true,
            variadic: false,
        }
    }

    /// An argument that consumes every remaining positional argument. `target`
    /// should be cumulative (a list value or an accumulator).
    pub fn new_variadic(target: impl Value + 'a, value_type: ValueType) -> Self {
        Self {
            variadic: true,
            ..Self::new(target, value_type)
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Set a display name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    pub fn target(&self) -> &dyn Value {
        self.target.as_ref()
    }

    pub fn target_mut(&mut self) -> &mut (dyn Value + 'a) {
        self.target.as_mut()
    }
}

impl fmt::Debug for ArgDef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgDef")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .field("required", &self.required)
            .field("variadic", &self.variadic)
            .field("current", &self.target.to_string())
            .finish()
    }
}

pub fn string_arg(target: &mut String) -> ArgDef<'_> {
    ArgDef::new(StringValue::new(target), ValueType::String)
}

pub fn bool_arg(target: &mut bool) -> ArgDef<'_> {
    ArgDef::new(BoolValue::new(target), ValueType::Bool)
}

pub fn int_arg(target: &mut i64) -> ArgDef<'_> {
    ArgDef::new(IntValue::new(target), ValueType::Int)
}

pub fn uint_arg(target: &mut u64) -> ArgDef<'_> {
    ArgDef::new(UintValue::new(target), ValueType::Uint)
}

pub fn float32_arg(target: &mut f32) -> ArgDef<'_> {
    ArgDef::new(Float32Value::new(target), ValueType::Float32)
}

pub fn float64_arg(target: &mut f64) -> ArgDef<'_> {
    ArgDef::new(Float64Value::new(target), ValueType::Float64)
}

pub fn variadic_string_arg(target: &mut Vec<String>) -> ArgDef<'_> {
    ArgDef::new_variadic(StringsValue::new(target), ValueType::String)
}

pub fn variadic_bool_arg(target: &mut Vec<bool>) -> ArgDef<'_> {
    ArgDef::new_variadic(BoolsValue::new(target), ValueType::Bool)
}

pub fn variadic_int_arg(target: &mut Vec<i64>) -> ArgDef<'_> {
    ArgDef::new_variadic(IntsValue::new(target), ValueType::Int)
}

pub fn variadic_uint_arg(target: &mut Vec<u64>) -> ArgDef<'_> {
    ArgDef::new_variadic(UintsValue::new(target), ValueType::Uint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_arg_is_required_and_single() {
        let mut s = String::new();
        let arg = string_arg(&mut s);
        assert_eq!(arg.value_type(), ValueType::String);
        assert!(arg.is_required());
        assert!(!arg.is_variadic());
        assert_eq!(arg.name(), None);
    }

    #[test]
    fn optional_and_named() {
        let mut port = 0u64;
        let arg = uint_arg(&mut port).optional().named("port");
        assert!(!arg.is_required());
        assert_eq!(arg.name(), Some("port"));
        assert_eq!(arg.value_type(), ValueType::Uint);
    }

    #[test]
    fn variadic_arg_is_required_by_default() {
        let mut hosts = Vec::new();
        let arg = variadic_string_arg(&mut hosts);
        assert!(arg.is_variadic());
        assert!(arg.is_required());
        assert!(arg.target().is_cumulative());
        drop(arg);
        assert!(!variadic_string_arg(&mut hosts).optional().is_required());
    }

    #[test]
    fn target_writes_through() {
        let mut enabled = false;
        let mut arg = bool_arg(&mut enabled);
        arg.target_mut().set("true").unwrap();
        assert_eq!(arg.target().to_string(), "true");
        drop(arg);
        assert!(enabled);
    }

    #[test]
    fn typed_constructors_declare_their_type() {
        let (mut i, mut f32v, mut f64v) = (0i64, 0f32, 0f64);
        let mut ints = Vec::new();
        let mut uints = Vec::new();
        let mut bools = Vec::new();
        assert_eq!(int_arg(&mut i).value_type(), ValueType::Int);
        assert_eq!(float32_arg(&mut f32v).value_type(), ValueType::Float32);
        assert_eq!(float64_arg(&mut f64v).value_type(), ValueType::Float64);
        assert_eq!(variadic_int_arg(&mut ints).value_type(), ValueType::Int);
        assert_eq!(variadic_uint_arg(&mut uints).value_type(), ValueType::Uint);
        assert_eq!(variadic_bool_arg(&mut bools).value_type(), ValueType::Bool);
    }

    #[test]
    fn debug_shows_current_value() {
        let mut s = "web".to_string();
        let arg = string_arg(&mut s).named("server");
        let dbg = format!("{arg:?}");
        assert!(dbg.contains("server"));
        assert!(dbg.contains("web"));
    }
}
