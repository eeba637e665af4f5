//! Active Directory client built on `ldap3`.
//!
//! Two kinds of connections are used:
//!
//! - **User binds** (`authenticate`): a fresh connection simple-binds as the
//!   submitted principal and is unbound right after. It is never reused since it
//!   now carries the user's identity.
//! - **Service binds** (`lookup`): connections bound as the service account are
//!   kept in a small idle list and reused until they sit unused for longer than
//!   `idle_timeout`.
//!
//! Both kinds draw from one [`Pool`] budget of `pool_size` connections, idle
//! service connections included.

use super::{AttributeSet, Directory, DirectoryError, LdapConfig, LOOKUP_ATTRIBUTES, pool::Pool};
use async_trait::async_trait;
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, LdapError, Scope, SearchEntry, ldap_escape};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// LDAP result code for `invalidCredentials`.
const RC_INVALID_CREDENTIALS: u32 = 49;

pub struct LdapDirectory {
    config: Arc<LdapConfig>,
    pool: Pool<Ldap>,
}

impl LdapDirectory {
    #[must_use]
    pub fn new(config: LdapConfig) -> Self {
        if config.tls_insecure {
            warn!(
                "TLS certificate verification is disabled for {}; do not run like this in production",
                config.url
            );
        }

        let pool = Pool::new(config.pool_size, config.idle_timeout, config.timeout);

        Self {
            config: Arc::new(config),
            pool,
        }
    }

    #[must_use]
    pub fn config(&self) -> &LdapConfig {
        &self.config
    }

    async fn connect(&self) -> Result<Ldap, DirectoryError> {
        let settings = LdapConnSettings::new()
            .set_conn_timeout(self.config.timeout)
            .set_no_tls_verify(self.config.tls_insecure);

        let (conn, ldap) = LdapConnAsync::with_settings(settings, &self.config.url)
            .await
            .map_err(|e| connection_error(&e))?;

        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                debug!("LDAP connection driver stopped: {e}");
            }
        });

        Ok(ldap)
    }

    async fn connect_service(&self) -> Result<Ldap, DirectoryError> {
        let mut ldap = self.connect().await?;

        let result = ldap
            .with_timeout(self.config.timeout)
            .simple_bind(&self.config.bind_dn, self.config.bind_password.expose_secret())
            .await
            .map_err(|e| bind_error(&e))?;

        if result.rc != 0 {
            return Err(DirectoryError::Bind(format!(
                "service account bind rejected: rc={} {}",
                result.rc, result.text
            )));
        }

        Ok(ldap)
    }

    async fn search(
        &self,
        ldap: &mut Ldap,
        identifier: &str,
    ) -> Result<Option<AttributeSet>, DirectoryError> {
        let filter = user_filter(identifier);

        let (entries, _result) = ldap
            .with_timeout(self.config.timeout)
            .search(
                &self.config.base_dn,
                Scope::Subtree,
                &filter,
                LOOKUP_ATTRIBUTES.to_vec(),
            )
            .await
            .map_err(|e| search_error(&e))?
            .success()
            .map_err(|e| search_error(&e))?;

        Ok(entries
            .into_iter()
            .next()
            .map(|entry| attribute_set(SearchEntry::construct(entry), identifier)))
    }
}

#[async_trait]
impl Directory for LdapDirectory {
    #[instrument(skip(self, secret))]
    async fn authenticate(
        &self,
        principal: &str,
        secret: &SecretString,
    ) -> Result<bool, DirectoryError> {
        // An empty simple bind is an anonymous bind and would succeed.
        if secret.expose_secret().is_empty() {
            debug!("empty secret, refusing to bind");
            return Ok(false);
        }

        let _permit = self.pool.acquire().await?;
        let mut ldap = self.connect().await?;

        let result = ldap
            .with_timeout(self.config.timeout)
            .simple_bind(principal, secret.expose_secret())
            .await
            .map_err(|e| bind_error(&e));

        log_unbind(ldap.unbind().await);

        let result = result?;
        match result.rc {
            0 => Ok(true),
            RC_INVALID_CREDENTIALS => Ok(false),
            rc => Err(DirectoryError::Bind(format!("rc={rc} {}", result.text))),
        }
    }

    #[instrument(skip(self))]
    async fn lookup(&self, identifier: &str) -> Result<Option<AttributeSet>, DirectoryError> {
        let (mut ldap, permit) = match self.pool.checkout().await {
            Some(pooled) => pooled,
            None => {
                let permit = self.pool.acquire().await?;
                (self.connect_service().await?, permit)
            }
        };

        // A connection that failed an operation is dropped with its permit.
        let found = self.search(&mut ldap, identifier).await?;
        self.pool.checkin(ldap, permit).await;

        Ok(found)
    }
}

/// Search filter matching user accounts by `sAMAccountName` or `userPrincipalName`.
fn user_filter(identifier: &str) -> String {
    let escaped = ldap_escape(identifier);
    format!(
        "(&(|(objectClass=user)(objectClass=person))(!(objectClass=computer))(!(objectClass=group))(|(sAMAccountName={escaped})(userPrincipalName={escaped})))"
    )
}

fn attribute_set(entry: SearchEntry, identifier: &str) -> AttributeSet {
    let first = |name: &str| {
        entry
            .attrs
            .get(name)
            .and_then(|values| values.first())
            .cloned()
    };

    AttributeSet {
        // Entries without the attribute fall back to the submitted name.
        sam_account_name: first("sAMAccountName").unwrap_or_else(|| identifier.to_string()),
        user_principal_name: first("userPrincipalName"),
        distinguished_name: entry.dn.clone(),
    }
}

fn log_unbind(result: Result<(), LdapError>) {
    if let Err(e) = result {
        debug!("LDAP unbind failed: {e}");
    }
}

fn connection_error(err: &LdapError) -> DirectoryError {
    match err {
        LdapError::Timeout { .. } => DirectoryError::Timeout,
        other => DirectoryError::Connection(other.to_string()),
    }
}

fn bind_error(err: &LdapError) -> DirectoryError {
    match err {
        LdapError::Timeout { .. } => DirectoryError::Timeout,
        other => DirectoryError::Bind(other.to_string()),
    }
}

fn search_error(err: &LdapError) -> DirectoryError {
    match err {
        LdapError::Timeout { .. } => DirectoryError::Timeout,
        other => DirectoryError::Search(other.to_string()),
    }
}
