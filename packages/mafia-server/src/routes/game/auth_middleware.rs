use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use serde_json::json;

use crate::utils::auth::verify_token;

/// `Authorization: Bearer <token>` from the header, if well formed.
pub fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// Rejects requests without a valid player token and hands the claims on to
/// the handler. Whether the token fits the room is the handler's call.
pub async fn auth_middleware(
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<serde_json::Value>)> {
    let Some(token) = bearer_token(&request) else {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "A player token is required" })),
        ));
    };

    let claims = match verify_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            log::warn!("Rejected token on {}: {}", request.uri(), e);
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": e.to_string() })),
            ));
        }
    };

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
