//! azfunc CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Catalog error
//! - 4: Template error
//! - 5: Cancelled

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use azfunc_catalog::CatalogError;
use azfunc_templates::TemplateError;

mod commands;
mod prompter;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const CATALOG_ERROR: u8 = 3;
    pub const TEMPLATE_ERROR: u8 = 4;
    pub const CANCELLED: u8 = 5;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        "azfunc=debug"
    } else if cli.quiet {
        "azfunc=error"
    } else {
        "azfunc=info"
    };

    // Initialize logging
    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(
            EnvFilter::from_default_env()
                .add_directive(level.parse().unwrap())
                .add_directive("warn".parse().unwrap()),
        )
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }

    let result = match cli.command {
        Commands::List(args) => commands::list::execute(args, &cli.catalog).await,
        Commands::Show(args) => commands::show::execute(args, &cli.catalog).await,
        Commands::Create(args) => commands::create::execute(args, &cli.catalog).await,
        Commands::Refresh(args) => commands::refresh::execute(args, &cli.catalog).await,
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            if exit_code == ExitCodes::CANCELLED {
                eprintln!("Cancelled.");
            } else {
                eprintln!("❌ Error: {:#}", e);
            }
            ExitCode::from(exit_code)
        }
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if let Some(template_error) = cause.downcast_ref::<TemplateError>() {
            return match template_error {
                TemplateError::Cancelled => ExitCodes::CANCELLED,
                TemplateError::UnknownValue { .. } | TemplateError::InvalidFunctionName(_) => {
                    ExitCodes::INVALID_ARGS
                }
                _ => ExitCodes::TEMPLATE_ERROR,
            };
        }
        if cause.downcast_ref::<CatalogError>().is_some() {
            return ExitCodes::CATALOG_ERROR;
        }
    }

    let msg = e.to_string().to_lowercase();
    if msg.contains("catalog") {
        ExitCodes::CATALOG_ERROR
    } else if msg.contains("template") {
        ExitCodes::TEMPLATE_ERROR
    } else if msg.contains("argument") || msg.contains("not found") {
        ExitCodes::INVALID_ARGS
    } else {
        ExitCodes::GENERAL_ERROR
    }
}
