//! Slot type inference
//!
//! Every identifier use-site in a template contributes a [`Constraint`]. The
//! constraints are unified per identifier into the [`Slot`] list a caller has
//! to fill. Loop iterands are resolved locally by their `foreach` block and
//! turned into a constraint on the iterator.

use std::fmt;

mod constraints;
mod unification;

pub use unification::{resolve_group, unify};

/// Type demanded of a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SlotType {
    String,
    Num,
    /// Unconstrained; refined by any concrete use
    Any,
    StringArray,
    NumArray,
    AnyArray,
}

impl SlotType {
    /// Array type holding elements of this type, if such an array is allowed
    pub fn array_of(self) -> Option<SlotType> {
        match self {
            SlotType::Num => Some(SlotType::NumArray),
            SlotType::Any => Some(SlotType::AnyArray),
            _ => None,
        }
    }
}

impl fmt::Display for SlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SlotType::String => "String",
            SlotType::Num => "Num",
            SlotType::Any => "Any",
            SlotType::StringArray => "StringArray",
            SlotType::NumArray => "NumArray",
            SlotType::AnyArray => "AnyArray",
        };
        f.write_str(name)
    }
}

/// One typing fact from a single use-site
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Constraint {
    pub identifier: String,
    pub slot_type: SlotType,
}

impl Constraint {
    pub fn new(identifier: impl Into<String>, slot_type: SlotType) -> Self {
        Constraint {
            identifier: identifier.into(),
            slot_type,
        }
    }
}

/// A resolved template parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub name: String,
    pub slot_type: SlotType,
}

impl Slot {
    pub fn new(name: impl Into<String>, slot_type: SlotType) -> Self {
        Slot {
            name: name.into(),
            slot_type,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.slot_type)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TypeError {
    #[error("Type error: iterand '{iterand}' is used with incompatible types {}", list(.types))]
    MixedArrayType {
        iterand: String,
        types: Vec<SlotType>,
    },
    #[error("Type error: cannot iterate '{iterator}' over elements of type {element}")]
    InvalidIteratorType { iterator: String, element: SlotType },
    #[error("Type error: slot '{identifier}' is used with incompatible types {}", list(.conflicting))]
    UnresolvableType {
        identifier: String,
        conflicting: Vec<SlotType>,
    },
}

// Helper: render a type set as "{Num, String}"
fn list(types: &[SlotType]) -> String {
    let names: Vec<String> = types.iter().map(ToString::to_string).collect();
    format!("{{{}}}", names.join(", "))
}
