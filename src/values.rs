//! Typed binders that write parsed argument strings into caller-owned storage.
//!
//! Every [`Value`] borrows its storage location for the lifetime of the schema
//! that holds it. Scalar values overwrite on each [`Value::set`]; list values and
//! [`Accumulator`] append one element per call.
//!
//! The built-in types are stamped out from the tables at the bottom of this
//! module:
//!
//! | Value | Storage | Accepted text |
//! |-------|---------|---------------|
//! | [`StringValue`] | `String` | anything |
//! | [`BoolValue`] | `bool` | `true`, `false` |
//! | [`IntValue`] | `i64` | base-10 integer |
//! | [`UintValue`] | `u64` | base-10 non-negative integer |
//! | [`Float32Value`] | `f32` | float |
//! | [`Float64Value`] | `f64` | float |
//!
//! plus the list forms [`StringsValue`], [`BoolsValue`], [`IntsValue`] and
//! [`UintsValue`] over `Vec<_>`.

use std::any::Any;
use std::fmt;

use crate::error::ValueError;

/// A dynamic value stored behind an argument.
///
/// `Display` renders the current content back to text.
pub trait Value: fmt::Display {
    /// Parse `s` and write it into the backing location.
    fn set(&mut self, s: &str) -> Result<(), ValueError>;

    /// The raw stored value, for introspection.
    fn get(&self) -> &dyn Any;

    /// Whether `set` appends instead of overwriting.
    fn is_cumulative(&self) -> bool {
        false
    }
}

/// Apply each string in order via [`Value::set`], stopping at the first failure.
pub fn set_list<V, I, S>(value: &mut V, values: I) -> Result<(), ValueError>
where
    V: Value + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for s in values {
        value.set(s.as_ref())?;
    }
    Ok(())
}

/// Builds a fresh per-element [`Value`] around one slot of type `T`.
pub type ElementFactory<T> = for<'e> fn(&'e mut T) -> Box<dyn Value + 'e>;

/// Collects every `set` into a caller-owned `Vec<T>`.
///
/// Conversion is delegated to the element factory, so any single-element
/// [`Value`] can be turned into a multi-value collector:
///
/// ```
/// use blockfig::values::{Accumulator, UintValue, Value};
///
/// let mut ports: Vec<u64> = Vec::new();
/// let mut acc = Accumulator::new(&mut ports, |slot| Box::new(UintValue::new(slot)));
/// acc.set("80").unwrap();
/// acc.set("443").unwrap();
/// assert_eq!(acc.to_string(), "80,443");
/// drop(acc);
/// assert_eq!(ports, vec![80, 443]);
/// ```
pub struct Accumulator<'a, T> {
    slice: &'a mut Vec<T>,
    element: ElementFactory<T>,
}

impl<'a, T> Accumulator<'a, T> {
    pub fn new(slice: &'a mut Vec<T>, element: ElementFactory<T>) -> Self {
        Self { slice, element }
    }
}

impl<T: Clone> fmt::Display for Accumulator<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.slice.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            let mut slot = item.clone();
            let rendered = (self.element)(&mut slot).to_string();
            f.write_str(&rendered)?;
        }
        Ok(())
    }
}

impl<T: Default + Clone + 'static> Value for Accumulator<'_, T> {
    fn set(&mut self, s: &str) -> Result<(), ValueError> {
        let mut slot = T::default();
        (self.element)(&mut slot).set(s)?;
        self.slice.push(slot);
        Ok(())
    }

    fn get(&self) -> &dyn Any {
        &*self.slice
    }

    fn is_cumulative(&self) -> bool {
        true
    }
}

fn parse_string(s: &str) -> Result<String, ValueError> {
    Ok(s.to_owned())
}

fn parse_bool(s: &str) -> Result<bool, ValueError> {
    match s {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ValueError::InvalidBool { input: s.to_owned() }),
    }
}

fn parse_int(s: &str) -> Result<i64, ValueError> {
    s.parse().map_err(|source| ValueError::InvalidInt {
        input: s.to_owned(),
        source,
    })
}

fn parse_uint(s: &str) -> Result<u64, ValueError> {
    s.parse().map_err(|source| ValueError::InvalidInt {
        input: s.to_owned(),
        source,
    })
}

fn parse_float32(s: &str) -> Result<f32, ValueError> {
    s.parse().map_err(|source| ValueError::InvalidFloat {
        input: s.to_owned(),
        source,
    })
}

fn parse_float64(s: &str) -> Result<f64, ValueError> {
    s.parse().map_err(|source| ValueError::InvalidFloat {
        input: s.to_owned(),
        source,
    })
}

macro_rules! scalar_values {
    ($($(#[$doc:meta])* $name:ident($ty:ty) => $parse:ident;)*) => {$(
        $(#[$doc])*
        pub struct $name<'a>(&'a mut $ty);

        impl<'a> $name<'a> {
            pub fn new(target: &'a mut $ty) -> Self {
                Self(target)
            }
        }

        impl fmt::Display for $name<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl Value for $name<'_> {
            fn set(&mut self, s: &str) -> Result<(), ValueError> {
                *self.0 = $parse(s)?;
                Ok(())
            }

            fn get(&self) -> &dyn Any {
                &*self.0
            }
        }
    )*};
}

macro_rules! list_values {
    ($($(#[$doc:meta])* $name:ident($ty:ty) => $parse:ident;)*) => {$(
        $(#[$doc])*
        pub struct $name<'a>(&'a mut Vec<$ty>);

        impl<'a> $name<'a> {
            pub fn new(target: &'a mut Vec<$ty>) -> Self {
                Self(target)
            }
        }

        impl fmt::Display for $name<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                for (i, item) in self.0.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }

        impl Value for $name<'_> {
            fn set(&mut self, s: &str) -> Result<(), ValueError> {
                self.0.push($parse(s)?);
                Ok(())
            }

            fn get(&self) -> &dyn Any {
                &*self.0
            }

            fn is_cumulative(&self) -> bool {
                true
            }
        }
    )*};
}

scalar_values! {
    /// Stores the argument verbatim.
    StringValue(String) => parse_string;
    /// Accepts exactly `true` or `false`.
    BoolValue(bool) => parse_bool;
    IntValue(i64) => parse_int;
    /// Rejects negative numbers.
    UintValue(u64) => parse_uint;
    Float32Value(f32) => parse_float32;
    Float64Value(f64) => parse_float64;
}

list_values! {
    StringsValue(String) => parse_string;
    BoolsValue(bool) => parse_bool;
    IntsValue(i64) => parse_int;
    UintsValue(u64) => parse_uint;
}
