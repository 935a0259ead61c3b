//! Conversion between ledger handles and content identifiers.
//!
//! The ledger stores the raw 32-byte sha2-256 digest of an identity
//! document as hex. The content network addresses the same document by the
//! base58 (Bitcoin alphabet) encoding of `0x12 0x20 || digest`, i.e. a
//! sha2-256 multihash.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CryptoError;

/// Multihash prefix: sha2-256 function code, then digest length.
pub const MULTIHASH_PREFIX: [u8; 2] = [0x12, 0x20];

/// Length of the digest carried in a ledger handle.
pub const DIGEST_LEN: usize = 32;

/// Base58-encoded content identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    /// Wrap an existing identifier, checking that it is valid base58.
    pub fn parse(cid: &str) -> Result<Self, CryptoError> {
        decode_content_id(cid)?;
        Ok(Self(cid.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ContentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Base58-encode arbitrary bytes as a content identifier.
pub fn encode_content_id(bytes: &[u8]) -> ContentId {
    ContentId(bs58::encode(bytes).into_string())
}

/// Decode a content identifier back into its bytes.
pub fn decode_content_id(cid: &str) -> Result<Vec<u8>, CryptoError> {
    if cid.is_empty() {
        return Err(CryptoError::InvalidContentId("empty identifier".into()));
    }
    bs58::decode(cid)
        .into_vec()
        .map_err(|e| CryptoError::InvalidContentId(format!("{}: {}", cid, e)))
}

/// Turn the hex handle stored on the ledger into a content identifier.
pub fn decode_ledger_handle(hex_handle: &str) -> Result<ContentId, CryptoError> {
    let digest = hex::decode(hex_handle)
        .map_err(|e| CryptoError::MalformedHandle(format!("{}: {}", hex_handle, e)))?;
    if digest.len() != DIGEST_LEN {
        return Err(CryptoError::MalformedHandle(format!(
            "expected {} digest bytes, got {}",
            DIGEST_LEN,
            digest.len()
        )));
    }

    let mut multihash = Vec::with_capacity(MULTIHASH_PREFIX.len() + DIGEST_LEN);
    multihash.extend_from_slice(&MULTIHASH_PREFIX);
    multihash.extend_from_slice(&digest);
    Ok(encode_content_id(&multihash))
}

/// Recover the ledger handle (upper-case hex digest) from a content identifier.
pub fn content_id_to_handle(cid: &str) -> Result<String, CryptoError> {
    let bytes = decode_content_id(cid)?;
    if bytes.len() != MULTIHASH_PREFIX.len() + DIGEST_LEN || bytes[..2] != MULTIHASH_PREFIX {
        return Err(CryptoError::InvalidContentId(format!(
            "{} is not a sha2-256 multihash",
            cid
        )));
    }
    Ok(hex::encode_upper(&bytes[MULTIHASH_PREFIX.len()..]))
}
