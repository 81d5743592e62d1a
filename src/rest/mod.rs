// rest/mod.rs — Public REST API server.
//
// Axum HTTP server, loopback-only by default.  Bridges the browser editors
// to the session manager, the completion engine, and the upstream config
// service.
//
// Endpoints:
//   GET    /api/v1/health
//   GET    /api/v1/sessions
//   POST   /api/v1/sessions
//   GET    /api/v1/sessions/{id}
//   DELETE /api/v1/sessions/{id}
//   PUT    /api/v1/sessions/{id}/document
//   POST   /api/v1/sessions/{id}/complete
//   GET    /api/v1/sessions/{id}/help
//   POST   /api/v1/sessions/{id}/validate
//   POST   /api/v1/sessions/{id}/submit

pub mod auth;
pub mod routes;

use anyhow::Result;
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use crate::AppContext;

pub async fn start_rest_server(ctx: Arc<AppContext>) -> Result<()> {
    let addr: SocketAddr = ctx.config.listen_addr().parse()?;

    let router = build_router(ctx);

    info!("REST API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        // Health (no auth)
        .route("/api/v1/health", get(routes::health::health))
        // Sessions
        .route(
            "/api/v1/sessions",
            get(routes::sessions::list_sessions).post(routes::sessions::create_session),
        )
        .route(
            "/api/v1/sessions/{id}",
            get(routes::sessions::get_session).delete(routes::sessions::delete_session),
        )
        .route(
            "/api/v1/sessions/{id}/document",
            put(routes::sessions::update_document),
        )
        // Completion
        .route(
            "/api/v1/sessions/{id}/complete",
            post(routes::completion::complete),
        )
        .route(
            "/api/v1/sessions/{id}/help",
            get(routes::completion::context_help),
        )
        // Upstream round-trips
        .route(
            "/api/v1/sessions/{id}/validate",
            post(routes::configs::validate),
        )
        .route(
            "/api/v1/sessions/{id}/submit",
            post(routes::configs::submit),
        )
        .layer(middleware::from_fn_with_state(
            ctx.clone(),
            auth::require_bearer,
        ))
        .with_state(ctx)
}
