use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use secrecy::ExposeSecret;
use serde_json::json;

use crate::config;

const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Gate in front of /api/admin. Interactive session handling lives in the
/// boundary layer; the backend only verifies the shared administration
/// token.
pub async fn require_admin(request: Request, next: Next) -> Response {
    let expected = config::get().admin.api_token.expose_secret();
    let provided = request
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok());

    match provided {
        Some(token) if token == expected => next.run(request).await,
        _ => (
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": {
                    "message": "Administration access denied",
                }
            })),
        )
            .into_response(),
    }
}
