use super::DirectoryError;
use secrecy::SecretString;
use std::time::Duration;
use url::Url;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_POOL_SIZE: usize = 10;

/// Directory connection settings, built once at startup.
#[derive(Debug, Clone)]
pub struct LdapConfig {
    pub url: String,
    pub base_dn: String,
    pub bind_dn: String,
    pub bind_password: SecretString,
    /// Appended to the submitted username to build the bind principal, e.g. `@corp.example.com`.
    pub domain_suffix: String,
    pub timeout: Duration,
    pub idle_timeout: Duration,
    pub pool_size: usize,
    pub tls_insecure: bool,
}

impl LdapConfig {
    /// # Errors
    /// Returns `DirectoryError::Configuration` if the URL is not `ldap://` or
    /// `ldaps://`, or if the base DN or bind DN is empty.
    pub fn new(
        url: &str,
        base_dn: String,
        bind_dn: String,
        bind_password: SecretString,
        domain_suffix: String,
    ) -> Result<Self, DirectoryError> {
        let parsed =
            Url::parse(url).map_err(|e| DirectoryError::Configuration(format!("{url}: {e}")))?;

        if !matches!(parsed.scheme(), "ldap" | "ldaps") {
            return Err(DirectoryError::Configuration(format!(
                "unsupported scheme '{}', expected ldap:// or ldaps://",
                parsed.scheme()
            )));
        }

        if base_dn.trim().is_empty() {
            return Err(DirectoryError::Configuration(
                "base DN must not be empty".to_string(),
            ));
        }

        if bind_dn.trim().is_empty() {
            return Err(DirectoryError::Configuration(
                "bind DN must not be empty".to_string(),
            ));
        }

        Ok(Self {
            url: url.to_string(),
            base_dn,
            bind_dn,
            bind_password,
            domain_suffix,
            timeout: DEFAULT_TIMEOUT,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            pool_size: DEFAULT_POOL_SIZE,
            tls_insecure: false,
        })
    }

    #[must_use]
    pub const fn with_timeouts(mut self, timeout: Duration, idle_timeout: Duration) -> Self {
        self.timeout = timeout;
        self.idle_timeout = idle_timeout;
        self
    }

    #[must_use]
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size.max(1);
        self
    }

    #[must_use]
    pub const fn with_tls_insecure(mut self, tls_insecure: bool) -> Self {
        self.tls_insecure = tls_insecure;
        self
    }
}
