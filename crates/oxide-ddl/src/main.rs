//! oxide-ddl CLI
//!
//! Command-line tool for rendering schema-change operations as SQL.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{Level, debug, info};
use tracing_subscriber::FmtSubscriber;

use oxide_ddl::prelude::*;

/// Dialect-aware DDL generation for schema migrations.
#[derive(Parser)]
#[command(name = "oxide-ddl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a JSON list of operations as SQL statements.
    Render {
        /// Operations file (`-` reads standard input).
        input: PathBuf,

        /// Target dialect.
        #[arg(short, long, env = "OXIDE_DDL_DIALECT", default_value = "sqlite")]
        dialect: Dialect,

        /// How to report operations the dialect cannot perform.
        #[arg(short, long, env = "OXIDE_DDL_COMPATIBILITY", default_value = "strict")]
        compatibility: CompatibilityMode,

        /// Fail when a foreign key or constraint references a table that is
        /// not created in the same run.
        #[arg(long)]
        strict_references: bool,
    },

    /// List supported dialects.
    Dialects,
}

fn read_input(input: &Path) -> anyhow::Result<String> {
    if input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read operations from stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read operations from {}", input.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Render {
            input,
            dialect,
            compatibility,
            strict_references,
        } => {
            let json = read_input(&input)?;
            let operations = parse_operations(&json)
                .with_context(|| format!("Invalid operations in {}", input.display()))?;
            debug!(count = operations.len(), "Loaded operations");

            let policy = if strict_references {
                ReferencePolicy::Error
            } else {
                ReferencePolicy::Warn
            };
            let options = GeneratorOptions::new()
                .compatibility(compatibility)
                .unresolved_references(policy);

            let mut generator = dialect.generator(options);
            let statements = generator.generate_all(&operations)?;

            for sql in &statements {
                println!("{sql};");
            }
            info!(
                dialect = %dialect,
                operations = operations.len(),
                statements = statements.len(),
                "Rendered migration"
            );
        }

        Commands::Dialects => {
            for dialect in Dialect::ALL {
                println!("{dialect}");
            }
        }
    }

    Ok(())
}
