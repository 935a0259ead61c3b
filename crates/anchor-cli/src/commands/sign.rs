//! `anchor sign-credential` / `anchor sign-presentation`.
//!
//! The secret key is read from an environment variable, never from argv.

use clap::Args;
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

use anchor_crypto::KeyPair;

#[derive(Args, Debug)]
pub struct SignCredentialArgs {
    /// Unsigned credential JSON file.
    pub credential: PathBuf,

    /// DID URL of the signing key (e.g. did:xrpl:1:r...#keys-1).
    #[arg(long)]
    pub verification_method: String,

    /// Environment variable holding the hex secret key.
    #[arg(long, default_value = "ANCHOR_SECRET_KEY")]
    pub secret_env: String,
}

#[derive(Args, Debug)]
pub struct SignPresentationArgs {
    /// Signed credential JSON files, in presentation order.
    pub credentials: Vec<PathBuf>,

    /// DID URL of the holder's signing key.
    #[arg(long)]
    pub verification_method: String,

    /// Verifier-supplied challenge.
    #[arg(long)]
    pub challenge: String,

    /// Verifier domain.
    #[arg(long)]
    pub domain: String,

    /// Environment variable holding the hex secret key.
    #[arg(long, default_value = "ANCHOR_SECRET_KEY")]
    pub secret_env: String,
}

fn load_keypair(var: &str) -> anyhow::Result<KeyPair> {
    let secret = Zeroizing::new(
        std::env::var(var).map_err(|_| anyhow::anyhow!("environment variable {} is not set", var))?,
    );
    Ok(KeyPair::from_secret_hex(&secret)?)
}

fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let contents = std::fs::read(path)
        .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))?;
    serde_json::from_slice(&contents)
        .map_err(|e| anyhow::anyhow!("invalid JSON in {}: {}", path.display(), e))
}

pub fn sign_credential(args: &SignCredentialArgs) -> anyhow::Result<()> {
    let keypair = load_keypair(&args.secret_env)?;
    let credential = read_json(&args.credential)?;
    let signed =
        anchor_credentials::sign_credential(credential, &args.verification_method, &keypair)?;
    println!("{}", serde_json::to_string_pretty(&signed)?);
    Ok(())
}

pub fn sign_presentation(args: &SignPresentationArgs) -> anyhow::Result<()> {
    let keypair = load_keypair(&args.secret_env)?;
    let credentials = args
        .credentials
        .iter()
        .map(|path| read_json(path))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let presentation = anchor_credentials::sign_presentation(
        credentials,
        &args.verification_method,
        &args.challenge,
        &args.domain,
        &keypair,
    )?;
    println!("{}", serde_json::to_string_pretty(&presentation)?);
    Ok(())
}
