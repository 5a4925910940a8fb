//! A compiled, reusable template.

use std::str::FromStr;

use crate::Error;
use crate::ast::Document;
use crate::limits::TemplateLimits;
use crate::parser;
use crate::semantic::Slot;
use crate::value::Context;

/// Parsed document, its source and its resolved slots.
///
/// Slots are resolved once when the template is compiled, so a template that
/// compiles is known to be well typed. `fill` can be called any number of
/// times with different contexts.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    document: Document,
    source: String,
    slots: Vec<Slot>,
}

impl Template {
    pub fn compile(source: &str) -> Result<Self, Error> {
        Self::compile_with_limits(source, &TemplateLimits::default())
    }

    #[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
    pub fn compile_with_limits(source: &str, limits: &TemplateLimits) -> Result<Self, Error> {
        let document = parser::parse(source, limits)?;
        let slots = document.get_parameters()?;
        tracing::debug!(
            lines = document.lines.len(),
            slots = slots.len(),
            "template compiled"
        );
        Ok(Self {
            document,
            source: source.to_string(),
            slots,
        })
    }

    /// Render the template with `context`
    pub fn fill(&self, context: &Context) -> Result<String, Error> {
        Ok(self.document.eval(context)?)
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl FromStr for Template {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}
