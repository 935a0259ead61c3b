//! `anchor init` — Write a default configuration file.

use clap::Args;
use std::path::Path;

use anchor_core::AnchorConfig;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing configuration file.
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: &InitArgs, config_path: &Path) -> anyhow::Result<()> {
    if config_path.exists() && !args.force {
        anyhow::bail!(
            "configuration file already exists at {} (use --force to overwrite)",
            config_path.display()
        );
    }

    crate::config::save(&AnchorConfig::default(), config_path)?;
    println!("Wrote default configuration to {}", config_path.display());
    println!("Edit [ledger] and [store] to point at your ledger node and gateway.");
    Ok(())
}
