// rest/auth.rs — Bearer-token guard for the REST API.
//
// Active only when `api_token` is configured; the health endpoint stays open
// either way so probes keep working.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::AppContext;

pub async fn require_bearer(
    State(ctx): State<Arc<AppContext>>,
    request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<serde_json::Value>)> {
    let Some(token) = ctx.config.api_token.as_deref() else {
        return Ok(next.run(request).await);
    };
    if request.uri().path() == "/api/v1/health" {
        return Ok(next.run(request).await);
    }

    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|presented| presented == token);

    if authorized {
        Ok(next.run(request).await)
    } else {
        Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Missing or invalid API token" })),
        ))
    }
}
