//! Alembic CLI - AI-directed tabular preprocessing.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze { file, output } => commands::analyze::run(file, output, cli.verbose),

        Commands::Plan {
            file,
            output,
            mock,
            model,
        } => commands::plan::run(file, output, mock, model, cli.verbose),

        Commands::Apply {
            file,
            plan,
            mock,
            overrides,
            output,
            log,
        } => commands::apply::run(file, plan, mock, overrides, output, log, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
