//! # Impact CLI Module
//!
//! This module implements the CLI interface for Impact.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `import` - Parse a sheet file and print the resulting screens
//! - `search` - Search the screens of a sheet file
//! - `graph` - Project a sheet file and export JSON or DOT
//! - `status` - Show counts for a sheet file
//!
//! Every command except `server` is stateless: the sheet file is its input
//! and nothing is persisted.

mod commands;

use crate::config::Config;
use clap::{Parser, Subcommand, ValueEnum};
use impact_core::ImpactError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Impact - screen/feature impact graphs
///
/// Model an application as screens holding features, connect features
/// that affect each other, and see what a change touches.
#[derive(Parser, Debug)]
#[command(name = "impact")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Path to a TOML config file (default: ./impact.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Graph export format.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphFormat {
    Json,
    Dot,
}

impl GraphFormat {
    /// File extension for the format.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Dot => "dot",
        }
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to (overrides config)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Sheet file to preload
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Parse a sheet file and print the resulting screens
    Import {
        /// Path to the sheet file (JSON array of rows)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Search the features of a sheet file
    Search {
        /// Path to the sheet file
        #[arg(short, long)]
        file: PathBuf,

        /// Search term
        #[arg(short = 'Q', long)]
        query: String,
    },

    /// Project a sheet file into a graph
    Graph {
        /// Path to the sheet file
        #[arg(short, long)]
        file: PathBuf,

        /// Search term used for emphasis
        #[arg(short = 'Q', long)]
        query: Option<String>,

        /// Name of the feature to select
        #[arg(short, long)]
        select: Option<String>,

        /// Output format
        #[arg(short = 't', long, value_enum, default_value = "json")]
        format: GraphFormat,

        /// Output file or directory (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show counts for a sheet file
    Status {
        /// Path to the sheet file
        #[arg(short, long)]
        file: PathBuf,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), ImpactError> {
    let config = Config::load(cli.config.as_deref())?;
    let json_mode = cli.json_mode;
    let max_size = config.import.max_file_size;

    match cli.command {
        Commands::Server { host, port, file } => {
            let config = config.with_cli(host, port);
            cmd_server(&config, file.as_deref()).await
        }
        Commands::Import { file } => cmd_import(&file, max_size, json_mode),
        Commands::Search { file, query } => cmd_search(&file, max_size, json_mode, &query),
        Commands::Graph {
            file,
            query,
            select,
            format,
            output,
        } => cmd_graph(
            &file,
            max_size,
            &GraphOptions {
                query: query.unwrap_or_default(),
                select,
                format,
                output,
            },
        ),
        Commands::Status { file } => cmd_status(&file, max_size, json_mode, cli.verbose),
    }
}
