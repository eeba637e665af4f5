use crate::cli::{actions::Action, commands, dispatch, telemetry};
use anyhow::Result;
use clap::{ArgMatches, parser::ValueSource};

/// Map verbosity count to tracing level
const fn get_verbosity_level(verbosity: u8) -> tracing::Level {
    match verbosity {
        0 => tracing::Level::ERROR,
        1 => tracing::Level::WARN,
        2 => tracing::Level::INFO,
        3 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }
}

/// Level requested with `-v` or `ADEAI_LOG_LEVEL`, `None` when neither is set.
fn requested_level(matches: &ArgMatches) -> Option<tracing::Level> {
    let explicit = matches!(
        matches.value_source(commands::logging::ARG_VERBOSITY),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    );

    if explicit {
        matches
            .get_one::<u8>(commands::logging::ARG_VERBOSITY)
            .copied()
            .map(get_verbosity_level)
    } else {
        None
    }
}

/// Main entry point for the CLI - builds and returns the Action
///
/// # Errors
///
/// Returns an error if argument parsing, telemetry initialization, or action dispatch fails
pub fn start() -> Result<Action> {
    let matches = commands::new().get_matches();

    telemetry::init(requested_level(&matches))?;

    dispatch::handler(&matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    const ARGS: [&str; 11] = [
        "adeai",
        "--ldap-url",
        "ldap://dc01.corp.example.com",
        "--ldap-base-dn",
        "DC=corp,DC=example,DC=com",
        "--ldap-bind-dn",
        "CN=svc-eai,DC=corp,DC=example,DC=com",
        "--ldap-bind-password",
        "s3cret",
        "--ldap-domain",
        "@corp.example.com",
    ];

    fn level_for(extra: &[&str], env: Option<&str>) -> Option<Level> {
        temp_env::with_vars([("ADEAI_LOG_LEVEL", env)], || {
            let mut args = ARGS.to_vec();
            args.extend_from_slice(extra);
            requested_level(&commands::new().get_matches_from(args))
        })
    }

    #[test]
    fn verbosity_levels() {
        assert_eq!(get_verbosity_level(0), Level::ERROR);
        assert_eq!(get_verbosity_level(1), Level::WARN);
        assert_eq!(get_verbosity_level(2), Level::INFO);
        assert_eq!(get_verbosity_level(3), Level::DEBUG);
        assert_eq!(get_verbosity_level(4), Level::TRACE);
        assert_eq!(get_verbosity_level(9), Level::TRACE);
    }

    #[test]
    fn unset_verbosity_uses_telemetry_default() {
        assert_eq!(level_for(&[], None), None);
        assert_eq!(telemetry::DEFAULT_LEVEL, Level::INFO);
    }

    #[test]
    fn explicit_error_is_kept() {
        assert_eq!(level_for(&[], Some("error")), Some(Level::ERROR));
    }

    #[test]
    fn flags_and_env_select_level() {
        assert_eq!(level_for(&["-vvv"], None), Some(Level::DEBUG));
        assert_eq!(level_for(&[], Some("warn")), Some(Level::WARN));
    }
}
