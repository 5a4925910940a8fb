//! Per-node constraint collection
//!
//! Each node reports the constraints of its own use-sites. `expected` carries
//! the type demanded by the enclosing position (an arithmetic operand or a
//! builtin argument); a bare `{{ name }}` has no demand and contributes `Any`.

use std::collections::BTreeSet;

use super::{Constraint, Slot, SlotType, TypeError, resolve_group, unify};
use crate::ast::{Document, Expr, ForEachBlock, Line, LineItem};

impl Document {
    /// All constraints of the template, before unification
    pub fn collect_constraints(&self) -> Result<Vec<Constraint>, TypeError> {
        let mut out = Vec::new();
        for line in &self.lines {
            line.collect_constraints(&mut out)?;
        }
        Ok(out)
    }

    /// Resolve the slots a caller must fill, sorted by name
    pub fn get_parameters(&self) -> Result<Vec<Slot>, TypeError> {
        unify(self.collect_constraints()?)
    }
}

impl Line {
    pub fn collect_constraints(&self, out: &mut Vec<Constraint>) -> Result<(), TypeError> {
        for item in &self.content {
            match item {
                LineItem::Text(_) => {}
                LineItem::ExpressionBlock(expr) => expr.collect_constraints(None, out),
                LineItem::ForEach(block) => block.collect_constraints(out)?,
            }
        }
        Ok(())
    }
}

impl ForEachBlock {
    /// Body constraints with the iterand replaced by one constraint on the iterator
    pub fn collect_constraints(&self, out: &mut Vec<Constraint>) -> Result<(), TypeError> {
        let mut body = Vec::new();
        for line in &self.body {
            line.collect_constraints(&mut body)?;
        }

        let (iterand, rest): (Vec<_>, Vec<_>) = body
            .into_iter()
            .partition(|c| c.identifier == self.iterand);

        let element = if iterand.is_empty() {
            SlotType::Any
        } else {
            let types: BTreeSet<SlotType> = iterand.iter().map(|c| c.slot_type).collect();
            resolve_group(&types).ok_or_else(|| TypeError::MixedArrayType {
                iterand: self.iterand.clone(),
                types: types.iter().copied().collect(),
            })?
        };

        let array = element
            .array_of()
            .ok_or_else(|| TypeError::InvalidIteratorType {
                iterator: self.iterator.clone(),
                element,
            })?;

        out.extend(rest);
        out.push(Constraint::new(self.iterator.as_str(), array));
        Ok(())
    }
}

impl Expr {
    pub fn collect_constraints(&self, expected: Option<SlotType>, out: &mut Vec<Constraint>) {
        match self {
            Expr::Identifier(name) => out.push(Constraint::new(
                name.as_str(),
                expected.unwrap_or(SlotType::Any),
            )),
            Expr::Number(_) => {}
            Expr::Group(inner) => inner.collect_constraints(expected, out),
            Expr::BinOp { lhs, rhs, .. } => {
                lhs.collect_constraints(Some(SlotType::Num), out);
                rhs.collect_constraints(Some(SlotType::Num), out);
            }
            Expr::Call { function, args } => {
                let declared = function.argument_types();
                for (i, arg) in args.iter().enumerate() {
                    let demand = declared.get(i).copied().unwrap_or(SlotType::Any);
                    arg.collect_constraints(Some(demand), out);
                }
            }
        }
    }
}
