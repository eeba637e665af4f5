//! Echo of the identity the proxy attached to the request.
//!
//! After a successful login the proxy forwards requests with `iv-user`,
//! `iv-groups` and the extended attributes it copied from our response, so
//! this is what a user lands on when they are already signed in.

use axum::{
    http::HeaderMap,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct Whoami {
    user: Option<String>,
    groups: Option<String>,
    server_name: Option<String>,
    authenticated_by: Option<String>,
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

impl From<&HeaderMap> for Whoami {
    fn from(headers: &HeaderMap) -> Self {
        Self {
            user: header(headers, "iv-user"),
            groups: header(headers, "iv-groups"),
            server_name: header(headers, "iv_server_name"),
            authenticated_by: header(headers, "authenticatedby"),
        }
    }
}

#[utoipa::path(
    get,
    path = "/whoami",
    responses(
        (status = 200, description = "Identity headers set by the proxy", body = Whoami)
    ),
    tag = "eai",
)]
#[instrument(skip(headers))]
pub async fn whoami(headers: HeaderMap) -> impl IntoResponse {
    Json(Whoami::from(&headers))
}
