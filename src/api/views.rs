use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::error;

pub const TITLE: &str = "Active Directory EAI Login";

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage<'a> {
    pub title: &'a str,
    pub error: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "proxy_error.html")]
pub struct ProxyErrorPage<'a> {
    pub title: &'a str,
    pub error: &'a str,
    pub proxy_code: &'a str,
}

/// Render a template into an HTML response, 500 if rendering fails.
pub fn render<T: Template>(template: &T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            error!("Failed to render template: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_page_without_error() -> anyhow::Result<()> {
        let html = LoginPage {
            title: TITLE,
            error: None,
        }
        .render()?;
        assert!(html.contains(TITLE));
        assert!(html.contains(r#"name="username""#));
        assert!(html.contains(r#"name="password""#));
        assert!(!html.contains(r#"class="error""#));
        Ok(())
    }

    #[test]
    fn login_page_with_error() -> anyhow::Result<()> {
        let html = LoginPage {
            title: TITLE,
            error: Some("invalid username or password..."),
        }
        .render()?;
        assert!(html.contains("invalid username or password..."));
        Ok(())
    }

    #[test]
    fn proxy_error_escapes_code() -> anyhow::Result<()> {
        let html = ProxyErrorPage {
            title: TITLE,
            error: "<script>alert(1)</script>",
            proxy_code: "<script>alert(1)</script>",
        }
        .render()?;
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        Ok(())
    }
}
