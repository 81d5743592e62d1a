// rest/routes/completion.rs — Completion and context-help routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

use super::sessions::session_not_found;
use crate::completion::engine;
use crate::completion::model::{CompletionRequest, HelpQuery};
use crate::AppContext;

pub async fn complete(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
    Json(body): Json<CompletionRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let Some(session) = ctx.sessions.get(&id).await else {
        return Err(session_not_found());
    };

    let document = body.document.unwrap_or(session.document);
    let lines: Vec<&str> = document.split('\n').collect();
    let result = engine::complete(&lines, body.cursor_line, body.cursor_ch, &session.schema);
    debug!(
        session_id = %id,
        line = body.cursor_line,
        ch = body.cursor_ch,
        candidates = result.candidates.len(),
        "completion"
    );
    Ok(Json(json!({ "completion": result })))
}

pub async fn context_help(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
    Query(query): Query<HelpQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let Some(session) = ctx.sessions.get(&id).await else {
        return Err(session_not_found());
    };

    let lines: Vec<&str> = session.document.split('\n').collect();
    let help = engine::describe_context(&lines, query.line, &session.schema);
    Ok(Json(json!({ "help": help })))
}
