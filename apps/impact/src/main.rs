//! # Impact - Screen/Feature Impact Graphs
//!
//! The main binary for Impact.
//!
//! This application provides:
//! - HTTP REST API server (axum-based), the application context for a UI
//! - CLI interface over sheet files
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │             apps/impact (THE BINARY)          │
//! │                                               │
//! │   ┌─────────────┐          ┌─────────────┐    │
//! │   │    CLI      │          │  HTTP API   │    │
//! │   │   (clap)    │          │   (axum)    │    │
//! │   └──────┬──────┘          └──────┬──────┘    │
//! │          └──────────┬─────────────┘           │
//! │                     ▼                         │
//! │             ┌───────────────┐                 │
//! │             │  impact-core  │                 │
//! │             │  (THE LOGIC)  │                 │
//! │             └───────────────┘                 │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! impact server --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! impact import -f sheet.json
//! impact search -f sheet.json -Q login
//! impact graph -f sheet.json --select "Password field" -t dot -o out/
//! ```

use clap::Parser;
use impact::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // IMPACT_LOG_FORMAT=json enables machine-parseable output. Logs go to
    // stderr so command output on stdout stays clean.
    let log_format = std::env::var("IMPACT_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "impact=info,impact_core=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Impact startup banner.
fn print_banner() {
    println!(
        r#"
  ██╗███╗   ███╗██████╗  █████╗  ██████╗████████╗
  ██║████╗ ████║██╔══██╗██╔══██╗██╔════╝╚══██╔══╝
  ██║██╔████╔██║██████╔╝███████║██║        ██║
  ██║██║╚██╔╝██║██╔═══╝ ██╔══██║██║        ██║
  ██║██║ ╚═╝ ██║██║     ██║  ██║╚██████╗   ██║
  ╚═╝╚═╝     ╚═╝╚═╝     ╚═╝  ╚═╝ ╚═════╝   ╚═╝

  Impact v{}

  Screens • Features • Connections
"#,
        env!("CARGO_PKG_VERSION")
    );
}
