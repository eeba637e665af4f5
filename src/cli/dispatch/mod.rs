use crate::cli::{
    actions::{Action, server::Args},
    commands::ldap::{
        ARG_LDAP_BASE_DN, ARG_LDAP_BIND_DN, ARG_LDAP_BIND_PASSWORD, ARG_LDAP_DOMAIN,
        ARG_LDAP_IDLE_TIMEOUT, ARG_LDAP_POOL_SIZE, ARG_LDAP_TIMEOUT, ARG_LDAP_TLS_INSECURE,
        ARG_LDAP_URL,
    },
};
use crate::directory::LdapConfig;
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::time::Duration;

fn required(matches: &clap::ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .with_context(|| format!("missing required argument: --{id}"))
}

/// # Errors
/// Returns an error if required arguments are missing or the directory settings are invalid.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);

    let url = required(matches, ARG_LDAP_URL)?;
    let ldap = LdapConfig::new(
        &url,
        required(matches, ARG_LDAP_BASE_DN)?,
        required(matches, ARG_LDAP_BIND_DN)?,
        SecretString::from(required(matches, ARG_LDAP_BIND_PASSWORD)?),
        required(matches, ARG_LDAP_DOMAIN)?,
    )
    .context("invalid directory configuration")?;

    let timeout = matches
        .get_one::<u64>(ARG_LDAP_TIMEOUT)
        .copied()
        .map_or(ldap.timeout, Duration::from_secs);
    let idle_timeout = matches
        .get_one::<u64>(ARG_LDAP_IDLE_TIMEOUT)
        .copied()
        .map_or(ldap.idle_timeout, Duration::from_secs);
    let pool_size = matches
        .get_one::<u16>(ARG_LDAP_POOL_SIZE)
        .map_or(ldap.pool_size, |size| usize::from(*size));

    let ldap = ldap
        .with_timeouts(timeout, idle_timeout)
        .with_pool_size(pool_size)
        .with_tls_insecure(matches.get_flag(ARG_LDAP_TLS_INSECURE));

    Ok(Action::Server(Args { port, ldap }))
}
