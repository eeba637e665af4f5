use axum::response::{IntoResponse, Redirect};

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 303, description = "Redirect to the login page")
    ),
    tag = "eai",
)]
// axum handler for /
pub async fn root() -> impl IntoResponse {
    Redirect::to(crate::eai::response::LOGIN_PATH)
}
