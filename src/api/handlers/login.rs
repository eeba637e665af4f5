use crate::api::views::{self, LoginPage, ProxyErrorPage, TITLE};
use crate::eai::{
    CredentialSubmission, Pipeline,
    router::{self, LoginEntry, LoginQuery},
};
use axum::{
    extract::{
        Extension, Form, Query,
        rejection::{FormRejection, QueryRejection},
    },
    response::{IntoResponse, Redirect, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument};
use utoipa::ToSchema;

/// Form posted by the proxy's EAI trigger.
///
/// Missing fields deserialize as empty strings and are rejected by validation.
#[derive(ToSchema, Deserialize, Default)]
pub struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    #[schema(format = Password)]
    password: String,
}

impl From<LoginForm> for CredentialSubmission {
    fn from(form: LoginForm) -> Self {
        Self::new(form.username, SecretString::from(form.password))
    }
}

#[utoipa::path(
    get,
    path = "/login",
    params(LoginQuery),
    responses(
        (status = 200, description = "Login form or proxy error page", content_type = "text/html"),
        (status = 303, description = "Already authenticated, redirect to /whoami")
    ),
    tag = "eai"
)]
#[instrument(skip_all)]
pub async fn login_page(query: Result<Query<LoginQuery>, QueryRejection>) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(err) => {
            debug!("Ignoring malformed login query: {err}");
            LoginQuery::default()
        }
    };

    match router::route(&query) {
        LoginEntry::LoginForm { error } => views::render(&LoginPage {
            title: TITLE,
            error,
        }),
        LoginEntry::RedirectWhoami => Redirect::to("/whoami").into_response(),
        LoginEntry::ProxyError { error, proxy_code } => views::render(&ProxyErrorPage {
            title: TITLE,
            error: &error,
            proxy_code: &proxy_code,
        }),
    }
}

#[utoipa::path(
    post,
    path = "/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Authenticated, EAI headers carry the identity"),
        (status = 303, description = "Rejected, redirect to /login?error=<code>")
    ),
    tag = "eai"
)]
// axum handler for the EAI trigger
#[instrument(skip_all)]
pub async fn login(
    pipeline: Extension<Arc<Pipeline>>,
    payload: Result<Form<LoginForm>, FormRejection>,
) -> Response {
    let form = match payload {
        Ok(Form(form)) => form,
        Err(err) => {
            debug!("Malformed login form: {err}");
            LoginForm::default()
        }
    };

    pipeline.run(form.into()).await.into_response()
}
