use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// DID method for identities anchored on the XRP Ledger.
pub const DEFAULT_DID_METHOD: &str = "xrpl";

/// Version byte of a classic XRPL account address.
pub const ACCOUNT_ADDRESS_VERSION: u8 = 0x00;

/// Validate a classic ledger account address (`r...`).
///
/// The address must use the Ripple base58 alphabet, carry the account
/// version byte and end with a valid 4-byte double-SHA256 checksum.
pub fn validate_account_address(address: &str) -> Result<(), CoreError> {
    if !address.starts_with('r') || !(25..=35).contains(&address.len()) {
        return Err(CoreError::InvalidAddress(address.to_string()));
    }
    bs58::decode(address)
        .with_alphabet(bs58::Alphabet::RIPPLE)
        .with_check(Some(ACCOUNT_ADDRESS_VERSION))
        .into_vec()
        .map_err(|e| CoreError::InvalidAddress(format!("{}: {}", address, e)))?;
    Ok(())
}

/// Decentralized Identifier anchored on a ledger account.
/// Format: `did:<method>:<network>:<address>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Did {
    method: String,
    network: String,
    address: String,
}

impl Did {
    /// Parse a DID of any method. The address must be a valid account address.
    pub fn parse(uri: &str) -> Result<Self, CoreError> {
        let parts: Vec<&str> = uri.split(':').collect();
        if parts.len() != 4 || parts[0] != "did" {
            return Err(CoreError::InvalidDid(format!(
                "DID must have format 'did:<method>:<network>:<address>', got: {}",
                uri
            )));
        }
        Self::from_parts(parts[1], parts[2], parts[3])
    }

    /// Parse a DID and require a specific method.
    pub fn parse_with_method(uri: &str, method: &str) -> Result<Self, CoreError> {
        let did = Self::parse(uri)?;
        if did.method != method {
            return Err(CoreError::UnsupportedMethod {
                expected: method.to_string(),
                actual: did.method,
            });
        }
        Ok(did)
    }

    /// Build a DID from its components.
    pub fn from_parts(method: &str, network: &str, address: &str) -> Result<Self, CoreError> {
        if method.is_empty()
            || !method
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(CoreError::InvalidDid(format!("invalid method: {:?}", method)));
        }
        if network.is_empty() || !network.chars().all(|c| c.is_ascii_digit()) {
            return Err(CoreError::InvalidDid(format!(
                "network must be a decimal index, got: {:?}",
                network
            )));
        }
        validate_account_address(address)?;

        Ok(Self {
            method: method.to_string(),
            network: network.to_string(),
            address: address.to_string(),
        })
    }

    /// DID method (e.g. `xrpl`).
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Network index segment.
    pub fn network(&self) -> &str {
        &self.network
    }

    /// Ledger account address the DID is anchored on.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Attach a fragment, producing a DID URL.
    pub fn with_fragment(&self, fragment: &str) -> DidUrl {
        DidUrl {
            did: self.clone(),
            fragment: Some(fragment.to_string()),
        }
    }
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "did:{}:{}:{}", self.method, self.network, self.address)
    }
}

impl FromStr for Did {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Did {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Did> for String {
    fn from(did: Did) -> Self {
        did.to_string()
    }
}

/// What a DID URL fragment points at inside an identity document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    /// `#key...` fragments select an entry of `verificationMethod`.
    VerificationMethod,
    /// `#profile...` and `#service...` fragments select an entry of `service`.
    Service,
}

impl FragmentKind {
    /// Classify a fragment by its prefix. Unknown prefixes yield `None`.
    pub fn classify(fragment: &str) -> Option<Self> {
        if fragment.starts_with("key") {
            Some(Self::VerificationMethod)
        } else if fragment.starts_with("profile") || fragment.starts_with("service") {
            Some(Self::Service)
        } else {
            None
        }
    }
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VerificationMethod => write!(f, "verification method"),
            Self::Service => write!(f, "service"),
        }
    }
}

/// A DID plus an optional `#fragment` selecting a sub-resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DidUrl {
    did: Did,
    fragment: Option<String>,
}

impl DidUrl {
    /// Parse a DID URL of any method.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let (base, fragment) = match input.split_once('#') {
            Some((base, fragment)) => {
                if fragment.is_empty() || fragment.contains('#') {
                    return Err(CoreError::InvalidDidUrl(format!(
                        "malformed fragment in {}",
                        input
                    )));
                }
                (base, Some(fragment.to_string()))
            }
            None => (input, None),
        };

        Ok(Self {
            did: Did::parse(base)?,
            fragment,
        })
    }

    /// Parse a DID URL and require a specific method.
    pub fn parse_with_method(input: &str, method: &str) -> Result<Self, CoreError> {
        let url = Self::parse(input)?;
        if url.did.method() != method {
            return Err(CoreError::UnsupportedMethod {
                expected: method.to_string(),
                actual: url.did.method().to_string(),
            });
        }
        Ok(url)
    }

    /// The base DID.
    pub fn did(&self) -> &Did {
        &self.did
    }

    /// The fragment without the leading `#`.
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Classification of the fragment, if any.
    ///
    /// Returns `Ok(None)` for a bare DID and an error for an unrecognised
    /// fragment prefix.
    pub fn fragment_kind(&self) -> Result<Option<FragmentKind>, CoreError> {
        match self.fragment.as_deref() {
            None => Ok(None),
            Some(fragment) => FragmentKind::classify(fragment)
                .map(Some)
                .ok_or_else(|| CoreError::UnsupportedFragment(fragment.to_string())),
        }
    }
}

impl fmt::Display for DidUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.fragment {
            Some(fragment) => write!(f, "{}#{}", self.did, fragment),
            None => write!(f, "{}", self.did),
        }
    }
}

impl FromStr for DidUrl {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Did> for DidUrl {
    fn from(did: Did) -> Self {
        Self {
            did,
            fragment: None,
        }
    }
}
