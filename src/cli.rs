use std::path::PathBuf;

use clap::{Parser, Subcommand};
use slotline::Value;

#[derive(Parser)]
#[command(name = "slotline")]
#[command(about = "Typed text templates")]
pub struct Cli {
    /// Project file with a [limits] table
    #[arg(long, global = true, default_value = "project.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the tokens of a template
    Lex(FileArgs),
    /// Parse a template and print its AST
    Ast(FileArgs),
    /// Fill a template with values and print the result
    Eval(EvalArgs),
    /// Print the slots a template requires and their types
    Type(FileArgs),
}

#[derive(clap::Args)]
pub struct FileArgs {
    /// Template file path
    pub file: PathBuf,
}

#[derive(clap::Args)]
pub struct EvalArgs {
    /// Template file path
    pub file: PathBuf,

    /// Slot values as KEY:VALUE, e.g. factor:2 or num_list:[1,2,3]
    #[arg(value_parser = parse_assignment)]
    pub assignments: Vec<(String, Value)>,

    /// TOML file of slot values, overridden by KEY:VALUE arguments
    #[arg(long = "values", value_name = "FILE")]
    pub values_file: Option<PathBuf>,
}

/// Parse `KEY:VALUE`
pub fn parse_assignment(arg: &str) -> Result<(String, Value), String> {
    let (key, value) = arg
        .split_once(':')
        .ok_or_else(|| format!("expected KEY:VALUE, found '{}'", arg))?;
    if key.is_empty() {
        return Err(format!("missing slot name in '{}'", arg));
    }
    Ok((key.to_string(), parse_value(value)))
}

// Helper: `[a, b]` is an array, anything else a scalar
fn parse_value(text: &str) -> Value {
    match text.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        Some(inner) if inner.trim().is_empty() => Value::Array(Vec::new()),
        Some(inner) => Value::Array(inner.split(',').map(|s| parse_scalar(s.trim())).collect()),
        None => parse_scalar(text),
    }
}

fn parse_scalar(text: &str) -> Value {
    if let Ok(i) = text.parse::<i64>() {
        return Value::Int(i);
    }
    // "nan" and "inf" stay strings
    match text.parse::<f64>() {
        Ok(f) if text.bytes().any(|b| b.is_ascii_digit()) => Value::Float(f),
        _ => Value::String(text.to_string()),
    }
}
