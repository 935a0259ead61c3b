//! Anchor CLI — resolve ledger-anchored DIDs and verify presentations.
//!
//! Subcommands: init, resolve, verify, handle-to-cid, cid-to-handle,
//! sign-credential, sign-presentation.

mod commands;
mod config;
mod logging;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Anchor — ledger-anchored identity toolkit.
#[derive(Parser, Debug)]
#[command(name = "anchor", version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, global = true, default_value = "anchor.toml")]
    config: PathBuf,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default configuration file.
    Init(commands::init::InitArgs),
    /// Resolve a DID or DID URL.
    Resolve(commands::resolve::ResolveArgs),
    /// Verify a presentation and the credentials it carries.
    Verify(commands::verify::VerifyArgs),
    /// Convert a ledger handle to a content identifier.
    HandleToCid(commands::codec::HandleToCidArgs),
    /// Convert a content identifier to a ledger handle.
    CidToHandle(commands::codec::CidToHandleArgs),
    /// Sign an unsigned credential.
    SignCredential(commands::sign::SignCredentialArgs),
    /// Wrap credentials in a signed presentation.
    SignPresentation(commands::sign::SignPresentationArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Init(args) = &cli.command {
        return commands::init::run(args, &cli.config);
    }

    let config = config::load(&cli.config)?;
    logging::init(&config.logging, cli.log_level.as_deref())?;

    match &cli.command {
        Commands::Init(_) => Ok(()),
        Commands::Resolve(args) => commands::resolve::run(args, &config).await,
        Commands::Verify(args) => commands::verify::run(args, &config).await,
        Commands::HandleToCid(args) => commands::codec::handle_to_cid(args),
        Commands::CidToHandle(args) => commands::codec::cid_to_handle(args),
        Commands::SignCredential(args) => commands::sign::sign_credential(args),
        Commands::SignPresentation(args) => commands::sign::sign_presentation(args),
    }
}
