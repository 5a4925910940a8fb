//! Evaluation of a parsed template against a context.
//!
//! Evaluation never mutates the tree or the caller's context. A loop binds its
//! iterand in a child [`Scope`] layered over the parent, so every iteration
//! sees the parent's bindings plus its own element.

use crate::ast::{Document, Expr, ForEachBlock, Line, LineItem};
use crate::value::{Context, Number, Value};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    #[error("Evaluation error: no value supplied for slot '{name}'")]
    UnboundSlot { name: String },
    #[error("Evaluation error: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
    #[error("Evaluation error: {function} takes {expected} arguments, {found} given")]
    Arity {
        function: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Evaluation error: {message}")]
    Arithmetic { message: String },
}

impl EvalError {
    pub(crate) fn division_by_zero() -> Self {
        EvalError::Arithmetic {
            message: "division by zero".to_string(),
        }
    }

    fn mismatch(expected: &str, name: &str, value: &Value) -> Self {
        EvalError::TypeMismatch {
            expected: expected.to_string(),
            found: format!("{} '{}'", value.kind(), name),
        }
    }
}

/// Name lookup chain: the caller's context at the root, one binding per loop level
#[derive(Debug, Clone, Copy)]
pub enum Scope<'a> {
    Root(&'a Context),
    Bound {
        parent: &'a Scope<'a>,
        name: &'a str,
        value: &'a Value,
    },
}

impl<'a> Scope<'a> {
    pub fn lookup(&self, name: &str) -> Option<&'a Value> {
        match *self {
            Scope::Root(context) => context.get(name),
            Scope::Bound {
                parent,
                name: bound,
                value,
            } => {
                if bound == name {
                    Some(value)
                } else {
                    parent.lookup(name)
                }
            }
        }
    }

    fn resolve(&self, name: &str) -> Result<&'a Value, EvalError> {
        self.lookup(name).ok_or_else(|| EvalError::UnboundSlot {
            name: name.to_string(),
        })
    }
}

impl Document {
    /// Render the template; lines are joined with `\n`
    pub fn eval(&self, context: &Context) -> Result<String, EvalError> {
        render_lines(&self.lines, &Scope::Root(context))
    }
}

fn render_lines(lines: &[Line], scope: &Scope<'_>) -> Result<String, EvalError> {
    let rendered = lines
        .iter()
        .map(|line| line.eval(scope))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rendered.join("\n"))
}

impl Line {
    pub fn eval(&self, scope: &Scope<'_>) -> Result<String, EvalError> {
        let mut out = String::new();
        for item in &self.content {
            match item {
                LineItem::Text(text) => out.push_str(text),
                LineItem::ExpressionBlock(expr) => out.push_str(&expr.eval(scope)?.to_string()),
                LineItem::ForEach(block) => out.push_str(&block.eval(scope)?),
            }
        }
        Ok(out)
    }
}

impl ForEachBlock {
    pub fn eval(&self, scope: &Scope<'_>) -> Result<String, EvalError> {
        let iterator = scope.resolve(&self.iterator)?;
        let items = iterator
            .as_array()
            .ok_or_else(|| EvalError::mismatch("array", &self.iterator, iterator))?;

        let mut iterations = Vec::with_capacity(items.len());
        for item in items {
            let child = Scope::Bound {
                parent: scope,
                name: &self.iterand,
                value: item,
            };
            iterations.push(render_lines(&self.body, &child)?);
        }
        Ok(iterations.join("\n"))
    }
}

impl Expr {
    pub fn eval(&self, scope: &Scope<'_>) -> Result<Value, EvalError> {
        match self {
            Expr::Identifier(name) => scope.resolve(name).cloned(),
            Expr::Number(n) => Ok(Value::from(*n)),
            Expr::Group(inner) => inner.eval(scope),
            Expr::BinOp { lhs, op, rhs } => {
                let lhs = lhs.eval_number(scope)?;
                let rhs = rhs.eval_number(scope)?;
                Number::apply(*op, lhs, rhs).map(Value::from)
            }
            Expr::Call { function, args } => {
                let args = args
                    .iter()
                    .map(|arg| arg.eval_number(scope))
                    .collect::<Result<Vec<_>, _>>()?;
                if args.len() != function.arity() {
                    return Err(EvalError::Arity {
                        function: function.name(),
                        expected: function.arity(),
                        found: args.len(),
                    });
                }
                function.call(&args).map(Value::from)
            }
        }
    }

    fn eval_number(&self, scope: &Scope<'_>) -> Result<Number, EvalError> {
        let value = self.eval(scope)?;
        value.as_number().ok_or_else(|| match self {
            Expr::Identifier(name) => EvalError::mismatch("number", name, &value),
            _ => EvalError::TypeMismatch {
                expected: "number".to_string(),
                found: value.kind().to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BinaryOp;
    use crate::builtins::Builtin;

    fn context(pairs: &[(&str, Value)]) -> Context {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn line(items: Vec<LineItem>) -> Line {
        Line::new(items)
    }

    #[test]
    fn test_identifier_lookup() {
        let ctx = context(&[("slot", Value::from("filled slot"))]);
        let value = Expr::ident("slot").eval(&Scope::Root(&ctx)).unwrap();
        assert_eq!(value, Value::from("filled slot"));
    }

    #[test]
    fn test_unbound_slot() {
        let ctx = Context::new();
        let result = Expr::ident("missing").eval(&Scope::Root(&ctx));
        assert_eq!(
            result,
            Err(EvalError::UnboundSlot {
                name: "missing".to_string()
            })
        );
    }

    #[test]
    fn test_precedence_tree() {
        // 3 + factor * 7
        let expr = Expr::binary(
            Expr::int(3),
            BinaryOp::Add,
            Expr::binary(Expr::ident("factor"), BinaryOp::Multiply, Expr::int(7)),
        );
        let ctx = context(&[("factor", Value::Int(2))]);
        assert_eq!(expr.eval(&Scope::Root(&ctx)).unwrap(), Value::Int(17));
    }

    #[test]
    fn test_arithmetic_on_string_is_a_mismatch() {
        let expr = Expr::binary(Expr::ident("name"), BinaryOp::Add, Expr::int(1));
        let ctx = context(&[("name", Value::from("bob"))]);
        assert!(matches!(
            expr.eval(&Scope::Root(&ctx)),
            Err(EvalError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_division_by_zero_fails() {
        let expr = Expr::binary(Expr::int(1), BinaryOp::Divide, Expr::ident("zero"));
        let ctx = context(&[("zero", Value::Int(0))]);
        assert!(matches!(
            expr.eval(&Scope::Root(&ctx)),
            Err(EvalError::Arithmetic { .. })
        ));
    }

    #[test]
    fn test_call_checks_arity() {
        let expr = Expr::Call {
            function: Builtin::Maximum,
            args: vec![Expr::int(1), Expr::int(2), Expr::int(3)],
        };
        let ctx = Context::new();
        assert_eq!(
            expr.eval(&Scope::Root(&ctx)),
            Err(EvalError::Arity {
                function: "Maximum",
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    fn test_call() {
        let expr = Expr::Call {
            function: Builtin::RoundUp,
            args: vec![Expr::ident("n"), Expr::int(10)],
        };
        let ctx = context(&[("n", Value::Int(42))]);
        assert_eq!(expr.eval(&Scope::Root(&ctx)).unwrap(), Value::Int(50));
    }

    #[test]
    fn test_line_concatenates_without_separator() {
        let l = line(vec![
            LineItem::text("a"),
            LineItem::ExpressionBlock(Expr::ident("x")),
            LineItem::text("c"),
        ]);
        let ctx = context(&[("x", Value::from("b"))]);
        assert_eq!(l.eval(&Scope::Root(&ctx)).unwrap(), "abc");
    }

    fn times_table() -> ForEachBlock {
        ForEachBlock {
            iterand: "num".to_string(),
            iterator: "num_list".to_string(),
            body: vec![line(vec![
                LineItem::ExpressionBlock(Expr::ident("factor")),
                LineItem::text(" * "),
                LineItem::ExpressionBlock(Expr::ident("num")),
                LineItem::text(" = "),
                LineItem::ExpressionBlock(Expr::binary(
                    Expr::ident("factor"),
                    BinaryOp::Multiply,
                    Expr::ident("num"),
                )),
            ])],
        }
    }

    #[test]
    fn test_foreach_joins_iterations_with_newlines() {
        let ctx = context(&[
            ("factor", Value::Int(2)),
            ("num_list", Value::from(vec![1_i64, 2, 3])),
        ]);
        let out = times_table().eval(&Scope::Root(&ctx)).unwrap();
        assert_eq!(out, "2 * 1 = 2\n2 * 2 = 4\n2 * 3 = 6");
    }

    #[test]
    fn test_foreach_over_empty_array() {
        let ctx = context(&[
            ("factor", Value::Int(2)),
            ("num_list", Value::Array(Vec::new())),
        ]);
        assert_eq!(times_table().eval(&Scope::Root(&ctx)).unwrap(), "");
    }

    #[test]
    fn test_foreach_requires_an_array() {
        let ctx = context(&[("factor", Value::Int(2)), ("num_list", Value::Int(3))]);
        assert!(matches!(
            times_table().eval(&Scope::Root(&ctx)),
            Err(EvalError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_iterand_shadows_without_mutating_context() {
        let ctx = context(&[
            ("factor", Value::Int(2)),
            ("num", Value::from("outer")),
            ("num_list", Value::from(vec![5_i64])),
        ]);
        let doc = Document::new(vec![
            line(vec![LineItem::ForEach(times_table())]),
            line(vec![LineItem::ExpressionBlock(Expr::ident("num"))]),
        ]);
        assert_eq!(doc.eval(&ctx).unwrap(), "2 * 5 = 10\nouter");
        assert_eq!(ctx["num"], Value::from("outer"));
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(Document::default().eval(&Context::new()).unwrap(), "");
    }
}
