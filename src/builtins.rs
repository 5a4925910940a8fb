//! Functions callable from inside a `{{ }}` block.

use std::fmt;

use crate::ast::BinaryOp;
use crate::eval::EvalError;
use crate::semantic::SlotType;
use crate::value::Number;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// Smallest multiple of `base` that is >= `val`
    RoundUp,
    /// Greatest multiple of `base` that is <= `val`
    RoundDown,
    Minimum,
    Maximum,
}

impl Builtin {
    pub const ALL: [Builtin; 4] = [
        Builtin::RoundUp,
        Builtin::RoundDown,
        Builtin::Minimum,
        Builtin::Maximum,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::RoundUp => "RoundUp",
            Builtin::RoundDown => "RoundDown",
            Builtin::Minimum => "Minimum",
            Builtin::Maximum => "Maximum",
        }
    }

    /// Declared type of each argument position
    pub fn argument_types(self) -> &'static [SlotType] {
        match self {
            Builtin::RoundUp | Builtin::RoundDown | Builtin::Minimum | Builtin::Maximum => {
                &[SlotType::Num, SlotType::Num]
            }
        }
    }

    pub fn arity(self) -> usize {
        self.argument_types().len()
    }

    /// Invoke the builtin on already-evaluated arguments
    pub fn call(self, args: &[Number]) -> Result<Number, EvalError> {
        let &[a, b] = args else {
            return Err(EvalError::Arity {
                function: self.name(),
                expected: self.arity(),
                found: args.len(),
            });
        };

        match self {
            Builtin::RoundUp => {
                require_base(self, b)?;
                let offset = Number::apply(BinaryOp::Subtract, b, a)?.floored_rem(b)?;
                Number::apply(BinaryOp::Add, a, offset)
            }
            Builtin::RoundDown => {
                require_base(self, b)?;
                let rem = a.floored_rem(b)?;
                Number::apply(BinaryOp::Subtract, a, rem)
            }
            Builtin::Minimum => Ok(if b.as_f64() < a.as_f64() { b } else { a }),
            Builtin::Maximum => Ok(if b.as_f64() > a.as_f64() { b } else { a }),
        }
    }
}

fn require_base(function: Builtin, base: Number) -> Result<(), EvalError> {
    if base.is_zero() {
        return Err(EvalError::Arithmetic {
            message: format!("{} called with a base of zero", function.name()),
        });
    }
    Ok(())
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
