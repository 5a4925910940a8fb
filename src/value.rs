//! Runtime values supplied to a template through its context.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

use crate::ast::BinaryOp;
use crate::eval::EvalError;

/// Mapping from slot name to the value filled into it.
pub type Context = HashMap<String, Value>;

/// A numeric value. Integers stay integers until a float or a division is involved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Number::Int(i) => i == 0,
            Number::Float(f) => f == 0.0,
        }
    }

    /// Apply an arithmetic operator to two numbers
    pub fn apply(op: BinaryOp, lhs: Number, rhs: Number) -> Result<Number, EvalError> {
        match (lhs, rhs) {
            (Number::Int(a), Number::Int(b)) => {
                let result = match op {
                    BinaryOp::Add => a.checked_add(b),
                    BinaryOp::Subtract => a.checked_sub(b),
                    BinaryOp::Multiply => a.checked_mul(b),
                    BinaryOp::Divide => {
                        if b == 0 {
                            return Err(EvalError::division_by_zero());
                        }
                        // Division is always true division, e.g. 10 / 2 = 5.0
                        return Ok(Number::Float(a as f64 / b as f64));
                    }
                };
                result.map(Number::Int).ok_or_else(|| EvalError::Arithmetic {
                    message: format!("integer overflow in {} {} {}", a, op, b),
                })
            }
            _ => {
                let (a, b) = (lhs.as_f64(), rhs.as_f64());
                let result = match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Subtract => a - b,
                    BinaryOp::Multiply => a * b,
                    BinaryOp::Divide => {
                        if b == 0.0 {
                            return Err(EvalError::division_by_zero());
                        }
                        a / b
                    }
                };
                Ok(Number::Float(result))
            }
        }
    }

    /// Modulo whose result takes the sign of the divisor
    pub fn floored_rem(self, divisor: Number) -> Result<Number, EvalError> {
        if divisor.is_zero() {
            return Err(EvalError::division_by_zero());
        }
        match (self, divisor) {
            (Number::Int(a), Number::Int(b)) => {
                let mut r = a.checked_rem(b).ok_or_else(|| EvalError::Arithmetic {
                    message: format!("integer overflow in {} mod {}", a, b),
                })?;
                if r != 0 && (r < 0) != (b < 0) {
                    r += b;
                }
                Ok(Number::Int(r))
            }
            _ => {
                let (a, b) = (self.as_f64(), divisor.as_f64());
                Ok(Number::Float(a - b * (a / b).floor()))
            }
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Float(x) => write_float(f, *x),
        }
    }
}

// Helper: floats keep a fractional part when printed, so 3.0 renders as "3.0"
fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    write!(f, "{:?}", x)
}

/// A value bound to a slot. Arrays hold scalars only.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
}

impl Value {
    /// Short name of the value's shape, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Int(i) => Some(Number::Int(*i)),
            Value::Float(f) => Some(Number::Float(*f)),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        match n {
            Number::Int(i) => Value::Int(i),
            Number::Float(f) => Value::Float(f),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write_float(f, *x),
            Value::String(s) => f.write_str(s),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Parse a TOML table into a context, e.g. `factor = 2` and `num_list = [1, 2, 3]`
pub fn context_from_toml(content: &str) -> Result<Context, toml::de::Error> {
    toml::from_str(content)
}
