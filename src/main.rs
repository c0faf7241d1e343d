//! Wordvault binary entry point.

use anyhow::Result;
use clap::{Parser, Subcommand};
use wordvault::cli::{doctor, export_cmd};

#[derive(Parser)]
#[command(
    name = "wordvault",
    version,
    about = "Export your saved Merriam-Webster words to an enriched JSON report"
)]
struct Cli {
    /// Enable debug-level logging.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in, fetch the saved-word list, enrich it, write the report.
    Export(export_cmd::ExportArgs),
    /// Check that the environment is ready for an export.
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let directive = if cli.verbose {
        "wordvault=debug"
    } else {
        "wordvault=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(directive.parse().expect("level directive is valid")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Export(args) => export_cmd::run(args).await,
        Command::Doctor => doctor::run().await,
    }
}
