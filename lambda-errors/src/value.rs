use std::fmt;

use serde_json::Value;

use crate::{Error, NormalizedError, WrappedError};

/// The error a handler failed with.
///
/// Handlers are expected to fail with structured errors. Plain values (strings, booleans,
/// numbers) are accepted too, but they are reported as invalid and replaced by a generic
/// error before they reach the client.
#[derive(Debug)]
pub enum ErrorValue {
    /// An error object.
    Structured(Error),
    /// A value that is not an error object.
    Primitive(Primitive),
}

/// A plain value used in place of an error object.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// A string.
    Str(String),
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
}

impl Primitive {
    /// Returns the JSON representation of this value.
    ///
    /// Non-finite floats become `null`; integral floats are written without a fraction.
    pub fn to_json(&self) -> Value {
        match self {
            Primitive::Str(s) => Value::from(s.as_str()),
            Primitive::Bool(b) => Value::from(*b),
            Primitive::Int(i) => Value::from(*i),
            Primitive::Float(n) => match integral(*n) {
                Some(i) => Value::from(i),
                None => Value::from(*n),
            },
        }
    }
}

// Largest integer an f64 represents exactly.
const MAX_EXACT: f64 = 9_007_199_254_740_991.0;

fn integral(n: f64) -> Option<i64> {
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_EXACT {
        Some(n as i64)
    } else {
        None
    }
}

/// Writes the raw value: strings are not quoted.
impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Str(s) => f.write_str(s),
            Primitive::Bool(b) => write!(f, "{}", b),
            Primitive::Int(i) => write!(f, "{}", i),
            Primitive::Float(n) if n.is_nan() => f.write_str("NaN"),
            Primitive::Float(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Primitive::Float(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<Error> for ErrorValue {
    fn from(err: Error) -> Self {
        ErrorValue::Structured(err)
    }
}

impl From<NormalizedError> for ErrorValue {
    fn from(err: NormalizedError) -> Self {
        ErrorValue::Structured(Box::new(err))
    }
}

impl From<WrappedError> for ErrorValue {
    fn from(err: WrappedError) -> Self {
        ErrorValue::Structured(Box::new(err))
    }
}

// Goes through the shortest decimal form so `1.1f32` stays `1.1`.
impl From<f32> for Primitive {
    fn from(value: f32) -> Self {
        let widened = value.to_string().parse().unwrap_or_else(|_| f64::from(value));
        Primitive::Float(widened)
    }
}

impl From<f32> for ErrorValue {
    fn from(value: f32) -> Self {
        ErrorValue::Primitive(value.into())
    }
}

impl From<Primitive> for ErrorValue {
    fn from(value: Primitive) -> Self {
        ErrorValue::Primitive(value)
    }
}

macro_rules! primitive_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Primitive {
                fn from(value: $ty) -> Self {
                    Primitive::$variant(value.into())
                }
            }

            impl From<$ty> for ErrorValue {
                fn from(value: $ty) -> Self {
                    ErrorValue::Primitive(value.into())
                }
            }
        )*
    };
}

primitive_from! {
    String => Str,
    &str => Str,
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => Int,
    u16 => Int,
    u32 => Int,
    f64 => Float,
}
