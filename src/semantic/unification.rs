//! Unification of collected constraints
//!
//! Constraints are deduplicated and grouped by identifier. Each group then
//! resolves to a single type:
//! - If every constraint in the group names the same type, that type wins
//! - If the group is exactly `{Any, Num}`, the slot is `Num`, since `Any` is
//!   refined by the concrete use
//! - Any other mixture cannot be resolved
//!
//! The result is sorted by identifier so the slot list is deterministic.

use std::collections::{BTreeMap, BTreeSet};

use super::{Constraint, Slot, SlotType, TypeError};

/// Resolve a set of types collected for one identifier
///
/// Returns `None` when the set mixes incompatible types.
pub fn resolve_group(types: &BTreeSet<SlotType>) -> Option<SlotType> {
    let mut iter = types.iter();
    match (iter.next(), iter.next(), iter.next()) {
        (Some(only), None, None) => Some(*only),
        (Some(SlotType::Num), Some(SlotType::Any), None) => Some(SlotType::Num),
        _ => None,
    }
}

/// Unify constraints into one slot per distinct identifier
pub fn unify(constraints: Vec<Constraint>) -> Result<Vec<Slot>, TypeError> {
    let mut groups: BTreeMap<String, BTreeSet<SlotType>> = BTreeMap::new();
    for Constraint {
        identifier,
        slot_type,
    } in constraints
    {
        groups.entry(identifier).or_default().insert(slot_type);
    }

    let mut slots = Vec::with_capacity(groups.len());
    for (identifier, types) in groups {
        match resolve_group(&types) {
            Some(slot_type) => {
                tracing::trace!(%identifier, %slot_type, "resolved slot");
                slots.push(Slot::new(identifier, slot_type));
            }
            None => {
                return Err(TypeError::UnresolvableType {
                    identifier,
                    conflicting: types.into_iter().collect(),
                });
            }
        }
    }
    Ok(slots)
}
