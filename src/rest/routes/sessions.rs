// rest/routes/sessions.rs — Session lifecycle routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::completion::schema::ConfigSchema;
use crate::session::EditorType;
use crate::AppContext;

pub async fn list_sessions(State(ctx): State<Arc<AppContext>>) -> Json<Value> {
    let sessions = ctx.sessions.list().await;
    Json(json!({ "sessions": sessions }))
}

pub async fn get_session(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match ctx.sessions.get(&id).await {
        Some(s) => Ok(Json(json!({
            "id": s.id,
            "filename": s.filename,
            "editorType": s.editor_type,
            "existing": s.existing,
            "document": s.document,
            "hasChanged": s.has_changed,
            "draft": s.draft,
            "canCommit": s.can_commit,
            "createdAt": s.created_at,
        }))),
        None => Err(session_not_found()),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub filename: String,
    pub editor_type: EditorType,
    #[serde(default)]
    pub existing: bool,
    #[serde(default)]
    pub document: String,
    #[serde(default)]
    pub schema: Option<ConfigSchema>,
}

pub async fn create_session(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<CreateSessionRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if body.filename.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "filename must not be empty" })),
        ));
    }

    match ctx
        .sessions
        .create(
            body.filename,
            body.editor_type,
            body.existing,
            body.document,
            body.schema,
        )
        .await
    {
        Ok(view) => Ok(Json(json!({ "session": view }))),
        Err(e) => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": e.to_string() })),
        )),
    }
}

pub async fn delete_session(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    if ctx.sessions.delete(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found())
    }
}

#[derive(Deserialize)]
pub struct UpdateDocumentRequest {
    pub document: String,
}

pub async fn update_document(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateDocumentRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match ctx.sessions.update_document(&id, body.document).await {
        Some(view) => Ok(Json(json!({ "session": view }))),
        None => Err(session_not_found()),
    }
}

pub fn session_not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Session not found" })),
    )
}
