mod cli;

use std::fs;
use std::path::Path;

use clap::Parser;
use slotline::{Context, Template, TemplateLimits, lexer, value};

use cli::{Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let cli = Cli::parse();
    let limits = TemplateLimits::from_project_toml(&cli.config)?;
    limits.validate()?;

    match cli.command {
        Commands::Lex(args) => {
            let source = read_source(&args.file)?;
            for token in lexer::scan(&source, &limits)? {
                println!("{}", token);
            }
        }
        Commands::Ast(args) => {
            let source = read_source(&args.file)?;
            let document = slotline::parse_with_limits(&source, &limits)?;
            println!("{:#?}", document);
        }
        Commands::Type(args) => {
            let source = read_source(&args.file)?;
            let template = Template::compile_with_limits(&source, &limits)?;
            for slot in template.slots() {
                println!("{}", slot);
            }
        }
        Commands::Eval(args) => {
            let source = read_source(&args.file)?;
            let template = Template::compile_with_limits(&source, &limits)?;

            let mut context = match &args.values_file {
                Some(path) => value::context_from_toml(&read_source(path)?)?,
                None => Context::new(),
            };
            context.extend(args.assignments);

            println!("{}", template.fill(&context)?);
        }
    }

    Ok(())
}

fn read_source(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e).into())
}

/// Install a `tracing` subscriber when `RUST_LOG` is set,
/// e.g. `RUST_LOG=slotline=trace`.
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_level(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}
