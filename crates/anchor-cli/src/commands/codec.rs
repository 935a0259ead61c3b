//! `anchor handle-to-cid` / `anchor cid-to-handle` — Identifier conversions.

use clap::Args;

use anchor_crypto::{content_id_to_handle, decode_ledger_handle};

#[derive(Args, Debug)]
pub struct HandleToCidArgs {
    /// Hex handle as stored in the ledger's DID object.
    pub handle: String,
}

#[derive(Args, Debug)]
pub struct CidToHandleArgs {
    /// Content identifier (Qm...).
    pub cid: String,
}

pub fn handle_to_cid(args: &HandleToCidArgs) -> anyhow::Result<()> {
    let cid = decode_ledger_handle(&args.handle)?;
    println!("{}", cid);
    Ok(())
}

pub fn cid_to_handle(args: &CidToHandleArgs) -> anyhow::Result<()> {
    println!("{}", content_id_to_handle(&args.cid)?);
    Ok(())
}
