//! CLI command structure using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "aspensqlplus")]
#[command(version, about = "Format and check SQL*Plus scripts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file to use instead of searching for aspensqlplus.toml
    #[arg(long, global = true, value_name = "PATH", env = "ASPENSQLPLUS_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show which formatter executable would be used, obtaining it if needed
    Resolve {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Format a script (reads stdin when FILE is omitted)
    Format {
        file: Option<PathBuf>,

        /// Write the result back to FILE
        #[arg(long, requires = "file", conflicts_with = "diff")]
        write: bool,

        /// Print a line diff instead of the formatted text
        #[arg(long)]
        diff: bool,
    },

    /// Report diagnostics for a script (reads stdin when FILE is omitted)
    Check {
        file: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check environment health
    Doctor {
        #[arg(long)]
        json: bool,
    },
}
