//! cachedirs — compile cache_dirs settings and cycle the daemon around them.
//!
//! # Usage
//!
//! ```text
//! cachedirs apply   [--form <body>] [--form-file <path|->] [-f KEY=VALUE]... [--default KEY=VALUE]... [--json]
//! cachedirs compile [--form <body>] [--form-file <path|->] [-f KEY=VALUE]... [--default KEY=VALUE]... [--json]
//! cachedirs service start|stop
//! ```
//!
//! The daemon control script is found under `--docroot` (or `$DOCUMENT_ROOT`,
//! default `/usr/local/emhttp`) unless `--script` names it directly.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use cachedirs_service::{init_tracing, LogFormat};
use commands::{apply::ApplyArgs, compile::CompileArgs, service::ServiceCommand};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "cachedirs",
    version,
    about = "Apply directory-caching settings to the cache_dirs daemon",
    long_about = None,
)]
struct Cli {
    /// Emit log records as JSON on stderr.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Stop the daemon, write the compiled options, and restart it if enabled.
    Apply(ApplyArgs),

    /// Print the compiled options without touching the daemon or any file.
    Compile(CompileArgs),

    /// Run a daemon lifecycle command directly.
    Service {
        #[command(subcommand)]
        command: ServiceCommand,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    });

    match cli.command {
        Commands::Apply(args) => args.run(),
        Commands::Compile(args) => args.run(),
        Commands::Service { command } => commands::service::run(command),
    }
}
