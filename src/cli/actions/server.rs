use crate::{
    api,
    directory::{LdapConfig, LdapDirectory},
    eai::Pipeline,
};
use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub ldap: LdapConfig,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    let domain_suffix = args.ldap.domain_suffix.clone();
    let directory = Arc::new(LdapDirectory::new(args.ldap));
    let pipeline = Arc::new(Pipeline::new(directory, domain_suffix));

    api::new(args.port, pipeline).await
}

fn log_startup_args(args: &Args) {
    let entries = startup_entries(args);
    log_entries("Startup configuration", &entries);
}

fn startup_entries(args: &Args) -> Vec<(&'static str, String)> {
    let ldap = &args.ldap;
    vec![
        ("listen", format!("tcp:{}", args.port)),
        ("ldap_url", redact_url(&ldap.url)),
        ("ldap_base_dn", ldap.base_dn.clone()),
        ("ldap_bind_dn", ldap.bind_dn.clone()),
        ("ldap_bind_password", "REDACTED".to_string()),
        ("ldap_domain", ldap.domain_suffix.clone()),
        ("ldap_timeout", format!("{}s", ldap.timeout.as_secs())),
        (
            "ldap_idle_timeout",
            format!("{}s", ldap.idle_timeout.as_secs()),
        ),
        ("ldap_pool_size", ldap.pool_size.to_string()),
        ("ldap_tls_verify", (!ldap.tls_insecure).to_string()),
    ]
}

// URLs may carry userinfo
fn redact_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("REDACTED"));
            }
            parsed.to_string()
        }
        Err(_) => "invalid-url".to_string(),
    }
}

fn log_entries(title: &str, entries: &[(&str, String)]) {
    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!("{}\n\n{title}:", adeai_banner());
    for (key, value) in entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ =
            std::fmt::Write::write_fmt(&mut message, format_args!("\n  {key}:{padding} {value}"));
    }
    info!("{message}");
}

fn adeai_banner() -> String {
    let short_hash = short_commit(crate::GIT_COMMIT_HASH);
    ADEAI_BANNER.replace(
        "{VERSION}",
        &format!(" - {} - {}", env!("CARGO_PKG_VERSION"), short_hash),
    )
}

fn short_commit(hash: &str) -> String {
    let trimmed = hash.trim();
    if trimmed.len() > 7 {
        trimmed[..7].to_string()
    } else {
        trimmed.to_string()
    }
}

const ADEAI_BANNER: &str = r"
    .---.
   /     \
  | () () |
   \  ^  /
    |||||   A D E A I {VERSION}
    |||||";
