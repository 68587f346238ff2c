use crate::error::CredentialError;
use std::fmt;
use zeroize::Zeroizing;

/// The mapping-API key. Never printed; wiped from memory on drop.
pub struct Credential {
    inner: Zeroizing<String>,
}

impl Credential {
    /// Wrap a secret read from a store. Surrounding whitespace (a trailing
    /// newline from CLI tools, typically) is stripped; nothing left is an error.
    pub fn new(raw: String) -> Result<Self, CredentialError> {
        let raw = Zeroizing::new(raw);
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CredentialError::Empty);
        }
        Ok(Self {
            inner: Zeroizing::new(trimmed.to_string()),
        })
    }

    /// The key itself, for placing in an outgoing request only.
    pub fn expose(&self) -> &str {
        &self.inner
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential([REDACTED])")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

/// Where the API key comes from. Exactly one per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// OS credential store, looked up by (service, account).
    Keychain { username: String, service: String },
    /// Keeper record, looked up by UID through the cached session.
    Vault { record_uid: String },
}

impl CredentialSource {
    pub fn backend_name(&self) -> &'static str {
        match self {
            CredentialSource::Keychain { .. } => "keychain",
            CredentialSource::Vault { .. } => "keeper",
        }
    }
}
