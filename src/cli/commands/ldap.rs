use clap::{Arg, ArgAction, Command};

pub const ARG_LDAP_URL: &str = "ldap-url";
pub const ARG_LDAP_BASE_DN: &str = "ldap-base-dn";
pub const ARG_LDAP_BIND_DN: &str = "ldap-bind-dn";
pub const ARG_LDAP_BIND_PASSWORD: &str = "ldap-bind-password";
pub const ARG_LDAP_DOMAIN: &str = "ldap-domain";
pub const ARG_LDAP_TIMEOUT: &str = "ldap-timeout";
pub const ARG_LDAP_IDLE_TIMEOUT: &str = "ldap-idle-timeout";
pub const ARG_LDAP_POOL_SIZE: &str = "ldap-pool-size";
pub const ARG_LDAP_TLS_INSECURE: &str = "ldap-tls-insecure";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_LDAP_URL)
                .long(ARG_LDAP_URL)
                .help("Directory URL, example: ldaps://dc01.corp.example.com:636")
                .env("ADEAI_LDAP_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_LDAP_BASE_DN)
                .long(ARG_LDAP_BASE_DN)
                .help("Search base, example: DC=corp,DC=example,DC=com")
                .env("ADEAI_LDAP_BASE_DN")
                .required(true),
        )
        .arg(
            Arg::new(ARG_LDAP_BIND_DN)
                .long(ARG_LDAP_BIND_DN)
                .help("Service account used for attribute lookups")
                .env("ADEAI_LDAP_BIND_DN")
                .required(true),
        )
        .arg(
            Arg::new(ARG_LDAP_BIND_PASSWORD)
                .long(ARG_LDAP_BIND_PASSWORD)
                .help("Service account password")
                .env("ADEAI_LDAP_BIND_PASSWORD")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_LDAP_DOMAIN)
                .long(ARG_LDAP_DOMAIN)
                .help("Suffix appended to the username when binding, example: @corp.example.com")
                .env("ADEAI_LDAP_DOMAIN")
                .required(true),
        )
        .arg(
            Arg::new(ARG_LDAP_TIMEOUT)
                .long(ARG_LDAP_TIMEOUT)
                .help("Connect and operation timeout in seconds")
                .default_value("5")
                .env("ADEAI_LDAP_TIMEOUT")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new(ARG_LDAP_IDLE_TIMEOUT)
                .long(ARG_LDAP_IDLE_TIMEOUT)
                .help("Seconds an idle pooled connection is kept")
                .default_value("15")
                .env("ADEAI_LDAP_IDLE_TIMEOUT")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_LDAP_POOL_SIZE)
                .long(ARG_LDAP_POOL_SIZE)
                .help("Maximum concurrent directory connections")
                .default_value("10")
                .env("ADEAI_LDAP_POOL_SIZE")
                .value_parser(clap::value_parser!(u16).range(1..)),
        )
        .arg(
            Arg::new(ARG_LDAP_TLS_INSECURE)
                .long(ARG_LDAP_TLS_INSECURE)
                .help("Skip directory certificate verification")
                .env("ADEAI_LDAP_TLS_INSECURE")
                .action(ArgAction::SetTrue),
        )
}
