//! Directory client contract.
//!
//! The EAI pipeline only needs two capabilities from the directory: verify a
//! principal/secret pair and fetch the attributes of an account. [`Directory`]
//! captures that contract so the pipeline can run against [`LdapDirectory`] in
//! production and an in-memory double in tests.

mod config;
mod ldap;
mod pool;

pub use config::LdapConfig;
pub use ldap::LdapDirectory;

use async_trait::async_trait;
use secrecy::SecretString;
use thiserror::Error;

/// Attributes requested from the directory for every lookup.
pub const LOOKUP_ATTRIBUTES: [&str; 2] = ["sAMAccountName", "userPrincipalName"];

/// Raw account attributes as returned by a directory lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSet {
    pub sam_account_name: String,
    pub user_principal_name: Option<String>,
    pub distinguished_name: String,
}

/// Directory errors.
///
/// Messages must never carry the user secret or the service account password.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("directory configuration error: {0}")]
    Configuration(String),

    #[error("directory connection failed: {0}")]
    Connection(String),

    #[error("directory bind failed: {0}")]
    Bind(String),

    #[error("directory search failed: {0}")]
    Search(String),

    #[error("directory operation timed out")]
    Timeout,

    #[error("directory connection pool exhausted")]
    PoolExhausted,
}

impl DirectoryError {
    /// True when the directory could not be reached at all, as opposed to the
    /// directory answering with an error.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout | Self::PoolExhausted)
    }
}

#[async_trait]
pub trait Directory: Send + Sync {
    /// Verify `secret` for `principal`.
    ///
    /// `Ok(false)` means the directory rejected the credentials.
    async fn authenticate(
        &self,
        principal: &str,
        secret: &SecretString,
    ) -> Result<bool, DirectoryError>;

    /// Fetch the account identified by `identifier`, `Ok(None)` if no entry matches.
    async fn lookup(&self, identifier: &str) -> Result<Option<AttributeSet>, DirectoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_errors() {
        assert!(DirectoryError::Timeout.is_unavailable());
        assert!(DirectoryError::PoolExhausted.is_unavailable());
        assert!(DirectoryError::Connection("refused".to_string()).is_unavailable());

        assert!(!DirectoryError::Bind("rc=50".to_string()).is_unavailable());
        assert!(!DirectoryError::Search("rc=32".to_string()).is_unavailable());
        assert!(!DirectoryError::Configuration("bad url".to_string()).is_unavailable());
    }

    #[test]
    fn error_messages_are_stable() {
        assert_eq!(
            DirectoryError::Timeout.to_string(),
            "directory operation timed out"
        );
        assert_eq!(
            DirectoryError::Bind("rc=53".to_string()).to_string(),
            "directory bind failed: rc=53"
        );
    }
}
