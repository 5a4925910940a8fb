//! Bounds on what a single template may cost to compile.
//!
//! The scanner checks input size, token count and name length as it goes.
//! The parser checks expression depth, which also caps how far evaluation
//! and slot inference recurse. A `[limits]` table in `project.toml` may
//! override any of them.

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Compile-time limits for one template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateLimits {
    /// Template size in bytes, checked before scanning
    pub max_input_size: usize,
    pub max_token_count: usize,
    /// Longest slot or function name, in bytes
    pub max_identifier_length: usize,
    /// Height of one `{{ }}` expression: parentheses, calls and operators
    pub max_expr_depth: usize,
}

impl Default for TemplateLimits {
    fn default() -> Self {
        Self {
            max_input_size: 10_000_000,
            max_token_count: 100_000,
            max_identifier_length: 1_000,
            max_expr_depth: 256,
        }
    }
}

impl TemplateLimits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the `[limits]` table of a project file.
    ///
    /// A missing file yields the defaults; an unreadable or malformed one is an error.
    pub fn from_project_toml<P: AsRef<Path>>(path: P) -> Result<Self, LimitError> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| LimitError {
            message: format!("Failed to read {}: {}", path.display(), e),
        })?;

        Self::from_toml_str(&content).map_err(|e| LimitError {
            message: format!("{}: {}", path.display(), e.message),
        })
    }

    /// Parse a project.toml document, overriding only the keys it specifies
    pub fn from_toml_str(content: &str) -> Result<Self, LimitError> {
        let config: ProjectConfig = toml::from_str(content).map_err(|e| LimitError {
            message: format!("Failed to parse limits: {}", e),
        })?;

        let mut limits = Self::default();

        if let Some(limits_config) = config.limits {
            if let Some(v) = limits_config.max_input_size {
                limits.max_input_size = v;
            }
            if let Some(v) = limits_config.max_token_count {
                limits.max_token_count = v;
            }
            if let Some(v) = limits_config.max_identifier_length {
                limits.max_identifier_length = v;
            }
            if let Some(v) = limits_config.max_expr_depth {
                limits.max_expr_depth = v;
            }
        }

        Ok(limits)
    }

    /// Reject zero limits and ones too large to protect the process
    pub fn validate(&self) -> Result<(), LimitError> {
        const MAX_INPUT_SIZE: usize = 100_000_000;
        // Deeper trees can exhaust a default thread stack during evaluation
        const MAX_EXPR_DEPTH: usize = 1_000;

        if self.max_input_size == 0 || self.max_input_size > MAX_INPUT_SIZE {
            return Err(LimitError::invalid("max_input_size", self.max_input_size));
        }

        if self.max_token_count == 0 {
            return Err(LimitError::invalid("max_token_count", self.max_token_count));
        }

        if self.max_identifier_length == 0 || self.max_identifier_length > 100_000 {
            return Err(LimitError::invalid(
                "max_identifier_length",
                self.max_identifier_length,
            ));
        }

        if self.max_expr_depth == 0 || self.max_expr_depth > MAX_EXPR_DEPTH {
            return Err(LimitError::invalid("max_expr_depth", self.max_expr_depth));
        }

        Ok(())
    }
}

// Other tables of project.toml are ignored
#[derive(Debug, Deserialize)]
struct ProjectConfig {
    limits: Option<LimitsConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LimitsConfig {
    max_input_size: Option<usize>,
    max_token_count: Option<usize>,
    max_identifier_length: Option<usize>,
    max_expr_depth: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Limit error: {message}")]
pub struct LimitError {
    pub message: String,
}

impl LimitError {
    fn invalid(name: &str, value: usize) -> Self {
        Self {
            message: format!(
                "Invalid limit '{}': {} is zero or out of range",
                name, value
            ),
        }
    }
}
