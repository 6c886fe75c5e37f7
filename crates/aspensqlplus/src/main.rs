mod cli;
mod commands;
mod context;
mod logging;
mod output;

use clap::Parser;
use cli::{Cli, Commands};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Resolve { json } => commands::resolve::run(json, config),
        Commands::Format { file, write, diff } => {
            commands::format::run(file.as_deref(), write, diff, config)
        }
        Commands::Check { file, json } => commands::check::run(file.as_deref(), json, config),
        Commands::Doctor { json } => commands::doctor::run(json, config),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
