//! Response emitter: renders an [`Outcome`] into what the proxy expects.
//!
//! Success carries the EAI trust headers with an empty 200 body. The proxy reads
//! them to build its own credential. Rejection is a redirect back to the login
//! page with `error=<code>`.

use super::outcome::{Credential, ErrorCode, GENERIC_FAILURE_CODE, Outcome};
use axum::{
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header::InvalidHeaderValue},
    response::{IntoResponse, Redirect, Response},
};
use tracing::error;

pub const HEADER_USER_ID: &str = "am-eai-ext-user-id";
pub const HEADER_USER_GROUPS: &str = "am-eai-ext-user-groups";
pub const HEADER_XATTRS: &str = "am-eai-xattrs";
pub const HEADER_EMAIL: &str = "tagvalue_email";
pub const HEADER_ALWAYS: &str = "tagvalue_always";
pub const HEADER_AUTHENTICATED_BY: &str = "authenticatedby";

/// Extended attributes the proxy should copy into its credential.
pub const XATTRS: &str = "tagvalue_email,tagvalue_always,authenticatedby";

/// Marker identifying this service as the authenticator.
pub const AUTHENTICATOR: &str = "adeai";

pub const LOGIN_PATH: &str = "/login";

#[must_use]
pub fn login_redirect_location(redirect_code: u16) -> String {
    format!("{LOGIN_PATH}?error={redirect_code}")
}

/// Build the trust headers for a credential.
///
/// # Errors
/// Returns an error if a directory value cannot be carried in an HTTP header.
pub fn credential_headers(credential: &Credential) -> Result<HeaderMap, InvalidHeaderValue> {
    let mut headers = HeaderMap::new();

    headers.insert(
        HeaderName::from_static(HEADER_USER_ID),
        HeaderValue::from_str(&credential.sam_account_name)?,
    );
    headers.insert(
        HeaderName::from_static(HEADER_USER_GROUPS),
        HeaderValue::from_static(credential.authorization_group.as_str()),
    );
    headers.insert(
        HeaderName::from_static(HEADER_XATTRS),
        HeaderValue::from_static(XATTRS),
    );
    headers.insert(
        HeaderName::from_static(HEADER_EMAIL),
        HeaderValue::from_str(&credential.email_address)?,
    );
    headers.insert(
        HeaderName::from_static(HEADER_ALWAYS),
        HeaderValue::from_static(HEADER_AUTHENTICATED_BY),
    );
    headers.insert(
        HeaderName::from_static(HEADER_AUTHENTICATED_BY),
        HeaderValue::from_static(AUTHENTICATOR),
    );

    Ok(headers)
}

fn rejected(code: ErrorCode) -> Response {
    Redirect::to(&login_redirect_location(code.redirect_code())).into_response()
}

#[must_use]
pub fn emit(outcome: &Outcome) -> Response {
    match outcome {
        Outcome::Success(credential) => match credential_headers(credential) {
            Ok(headers) => (StatusCode::OK, headers).into_response(),
            Err(err) => {
                error!(
                    "Cannot emit credential for {:?}: {err}",
                    credential.sam_account_name
                );
                Redirect::to(&login_redirect_location(GENERIC_FAILURE_CODE)).into_response()
            }
        },
        Outcome::Rejected(code) => rejected(*code),
    }
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        emit(&self)
    }
}
