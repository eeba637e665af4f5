//! Login entry router for `GET /login`.
//!
//! The proxy sends users back to the login page with its own status in the query
//! string (`ERROR_CODE`, `TAM_OP`), and our own POST handler uses `error`. The
//! guards below are checked in order and the first match wins; some are narrower
//! versions of later ones.

use super::outcome::INVALID_INPUT_CODE;
use serde::Deserialize;
use utoipa::IntoParams;

/// Proxy status: the user already holds an authenticated session.
pub const PROXY_ALREADY_AUTHENTICATED: &str = "0x38cf05e7";
/// Proxy status: no error, combined with `TAM_OP=login` on a plain login prompt.
pub const PROXY_OK: &str = "0x00000000";
/// Proxy status: access to the requested resource is forbidden.
pub const PROXY_FORBIDDEN: &str = "0x38cf0427";

pub const MSG_INVALID_CREDENTIALS: &str = "invalid username or password...";
pub const MSG_GENERIC_FAILURE: &str = "something has gone horribly wrong...";
pub const MSG_FORBIDDEN: &str = "Forbidden";

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LoginQuery {
    /// Error code set by a failed `POST /login`
    pub error: Option<String>,
    /// Proxy status code
    #[serde(rename = "ERROR_CODE")]
    pub error_code: Option<String>,
    /// Proxy operation
    #[serde(rename = "TAM_OP")]
    pub tam_op: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginEntry {
    /// Show the login form, optionally with a message.
    LoginForm { error: Option<&'static str> },
    /// Already signed in, show who the proxy thinks the user is.
    RedirectWhoami,
    /// Show the proxy error page with its raw status code.
    ProxyError { error: String, proxy_code: String },
}

/// Treats empty values as absent.
fn present(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

fn is_invalid_input_code(error: &str) -> bool {
    error.trim().parse::<u16>() == Ok(INVALID_INPUT_CODE)
}

#[must_use]
pub fn route(query: &LoginQuery) -> LoginEntry {
    let error = present(query.error.as_ref());
    let error_code = present(query.error_code.as_ref());
    let tam_op = present(query.tam_op.as_ref());

    if error.is_some_and(is_invalid_input_code) {
        return LoginEntry::LoginForm {
            error: Some(MSG_INVALID_CREDENTIALS),
        };
    }

    if error.is_some() {
        return LoginEntry::LoginForm {
            error: Some(MSG_GENERIC_FAILURE),
        };
    }

    match (error_code, tam_op) {
        (Some(PROXY_ALREADY_AUTHENTICATED), _) => LoginEntry::RedirectWhoami,
        (Some(PROXY_OK), Some("login")) => LoginEntry::LoginForm { error: None },
        (Some(PROXY_FORBIDDEN), _) => LoginEntry::ProxyError {
            error: MSG_FORBIDDEN.to_string(),
            proxy_code: PROXY_FORBIDDEN.to_string(),
        },
        (Some(code), _) => LoginEntry::ProxyError {
            error: code.to_string(),
            proxy_code: code.to_string(),
        },
        (None, _) => LoginEntry::LoginForm { error: None },
    }
}
