//! Anchor cryptography: the ledger-handle / content-identifier codec and
//! secp256k1 ECDSA signing and verification.

pub mod codec;
pub mod error;
pub mod keys;
pub mod signing;

pub use codec::{
    content_id_to_handle, decode_content_id, decode_ledger_handle, encode_content_id, ContentId,
};
pub use error::CryptoError;
pub use keys::KeyPair;
pub use signing::{is_supported_proof_type, sign, sign_hex, verify, verify_hex};
