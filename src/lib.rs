//! Text templates with typed slots.
//!
//! A template is plain text with `{{ expr }}` blocks and line-level
//! `{{ foreach item in items }}` ... `{{ endforeach }}` loops. Compiling a
//! template parses it and infers the type of every slot it references;
//! filling it evaluates the tree against a [`Context`].
//!
//! ```no_run
//! use slotline::{Context, Template, Value};
//!
//! let template = Template::compile("{{ 3 + factor * 7 }}")?;
//! let mut context = Context::new();
//! context.insert("factor".to_string(), Value::Int(2));
//! assert_eq!(template.fill(&context)?, "17");
//! # Ok::<(), slotline::Error>(())
//! ```

pub mod ast;
pub mod builtins;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod limits;
pub mod parser;
pub mod semantic;
pub mod template;
pub mod value;

pub use ast::Document;
pub use error::Error;
pub use limits::TemplateLimits;
pub use semantic::{Slot, SlotType};
pub use template::Template;
pub use value::{Context, Value};

/// Tokenize `source` in literal-text mode with default limits
pub fn scan(source: &str) -> Result<Vec<lexer::Token>, lexer::LexError> {
    lexer::scan(source, &TemplateLimits::default())
}

/// Parse `source` with default limits
pub fn parse(source: &str) -> Result<Document, parser::ParseError> {
    parser::parse(source, &TemplateLimits::default())
}

pub fn parse_with_limits(
    source: &str,
    limits: &TemplateLimits,
) -> Result<Document, parser::ParseError> {
    parser::parse(source, limits)
}
