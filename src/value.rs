//! Dynamically typed values compared by assertions.
//!
//! Assertions routed through providers receive their arguments as a slice of
//! `Value`s, and the equality primitives need both a strict and a loose notion
//! of equality, so everything an assertion compares is converted into this type.

use itertools::Itertools;
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    /// A short, human readable name for the variant.
    pub fn type_name(&self) -> &'static str {
        match *self {
            Value::Null => "null",
            Value::Bool(..) => "bool",
            Value::Int(..) => "int",
            Value::Float(..) => "float",
            Value::Str(..) => "string",
            Value::List(..) => "list",
        }
    }

    /// Strict equality: same variant and same value.
    pub fn strict_eq(&self, other: &Value) -> bool {
        self == other
    }

    /// Loose equality.
    ///
    /// Numbers and numeric strings compare by numeric value, booleans and null
    /// compare by truthiness, lists compare element-wise.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Null, v) | (v, Value::Null) => !v.is_truthy(),
            (Value::Bool(b), v) | (v, Value::Bool(b)) => *b == v.is_truthy(),
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(a, b)| a.loose_eq(b))
            },
            (Value::Str(a), Value::Str(b)) => match (self.as_number(), other.as_number()) {
                (Some(a), Some(b)) => a == b,
                _ => a == b,
            },
            _ => match (self.as_number(), other.as_number()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }

    pub fn is_truthy(&self) -> bool {
        match *self {
            Value::Null => false,
            Value::Bool(b) => b,
            Value::Int(i) => i != 0,
            Value::Float(f) => f != 0.0,
            Value::Str(ref s) => !s.is_empty() && s != "0",
            Value::List(ref l) => !l.is_empty(),
        }
    }

    /// The numeric interpretation of the value, if it has one.
    pub fn as_number(&self) -> Option<f64> {
        match *self {
            Value::Int(i) => Some(i as f64),
            Value::Float(f) => Some(f),
            Value::Str(ref s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match *self {
            Value::Str(ref s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match *self {
            Value::List(ref l) => Some(l),
            _ => None,
        }
    }

    /// Number of elements in a list or characters in a string.
    pub fn len(&self) -> Option<usize> {
        match *self {
            Value::Str(ref s) => Some(s.chars().count()),
            Value::List(ref l) => Some(l.len()),
            _ => None,
        }
    }

    /// Renders the value for failure messages; strings are quoted.
    pub fn dump(&self) -> String {
        match *self {
            Value::Str(ref s) => format!("{:?}", s),
            Value::List(ref l) => format!("[{}]", l.iter().map(Value::dump).join(", ")),
            ref v => v.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Value::Null => write!(fmt, "null"),
            Value::Bool(b) => write!(fmt, "{}", b),
            Value::Int(i) => write!(fmt, "{}", i),
            Value::Float(f) => write!(fmt, "{:?}", f),
            Value::Str(ref s) => write!(fmt, "{}", s),
            Value::List(ref l) => write!(fmt, "[{}]", l.iter().join(", ")),
        }
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(i: $ty) -> Self { Value::Int(i as i64) }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32, usize);

impl From<f32> for Value {
    fn from(f: f32) -> Self { Value::Float(f as f64) }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self { Value::Float(f) }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self { Value::Bool(b) }
}

impl From<()> for Value {
    fn from(_: ()) -> Self { Value::Null }
}

impl<'a> From<&'a str> for Value {
    fn from(s: &'a str) -> Self { Value::Str(s.to_owned()) }
}

impl From<String> for Value {
    fn from(s: String) -> Self { Value::Str(s) }
}

impl<'a> From<&'a String> for Value {
    fn from(s: &'a String) -> Self { Value::Str(s.clone()) }
}

impl<T> From<Vec<T>> for Value where T: Into<Value> {
    fn from(v: Vec<T>) -> Self { Value::List(v.into_iter().map(Into::into).collect()) }
}

impl<T> From<Option<T>> for Value where T: Into<Value> {
    fn from(v: Option<T>) -> Self { v.map(Into::into).unwrap_or(Value::Null) }
}

/// Builds a `Vec<Value>` argument list for dynamically dispatched assertions.
#[macro_export]
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        vec![$($crate::Value::from($arg)),*]
    };
}
