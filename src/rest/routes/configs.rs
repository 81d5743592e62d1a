// rest/routes/configs.rs — Validation and submission round-trips.
//
// Both routes gate on the local identifier precheck before talking to the
// upstream service, and both keep the session's validate-before-commit flags
// in step with what the upstream answered.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

use super::sessions::session_not_found;
use crate::upstream::model::{ResultType, ValidationOutcome};
use crate::upstream::{precheck, SubmitRequest, UpstreamError};
use crate::AppContext;

#[derive(Deserialize)]
pub struct ValidateRequest {
    #[serde(default)]
    pub document: Option<String>,
    #[serde(default)]
    pub draft: bool,
}

pub async fn validate(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
    Json(body): Json<ValidateRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let Some(mut session) = ctx.sessions.get(&id).await else {
        return Err(session_not_found());
    };

    // An inline document replaces the stored one before validation so the
    // flags always describe what was actually checked.
    if let Some(document) = body.document {
        ctx.sessions.update_document(&id, document.clone()).await;
        session.document = document;
    }

    if let Err(e) = precheck::check(&session.document, &session.filename, session.editor_type) {
        ctx.sessions.set_validation_state(&id, false, body.draft).await;
        return Ok(Json(json!({
            "resultType": "error",
            "summary": format!("Validation failed: {e}"),
            "canCommit": false,
        })));
    }

    match ctx
        .upstream
        .validate(&session.document, session.editor_type)
        .await
    {
        Ok(ValidationOutcome::Valid) => {
            ctx.sessions.set_validation_state(&id, true, body.draft).await;
            Ok(Json(json!({
                "summary": "Validation successful",
                "canCommit": true,
            })))
        }
        Ok(ValidationOutcome::Report(report)) => {
            let can_commit = report.severity() != ResultType::Error;
            ctx.sessions.set_validation_state(&id, can_commit, body.draft).await;
            Ok(Json(json!({
                "resultType": report.severity(),
                "lineNumber": report.line(),
                "summary": report.summary,
                "details": report.details,
                "canCommit": can_commit,
            })))
        }
        Err(e) => {
            warn!(session_id = %id, error = %e, "validation round-trip failed");
            ctx.sessions.set_validation_state(&id, false, body.draft).await;
            Err((
                upstream_failure_status(&e),
                Json(json!({ "error": e.to_string() })),
            ))
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBody {
    pub commit_msg: String,
    #[serde(default)]
    pub long_msg: String,
    #[serde(default)]
    pub draft: bool,
}

pub async fn submit(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
    Json(body): Json<SubmitBody>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let Some(session) = ctx.sessions.get(&id).await else {
        return Err(session_not_found());
    };
    if body.commit_msg.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "commit message must not be empty" })),
        ));
    }
    if !session.can_commit {
        return Err((
            StatusCode::CONFLICT,
            Json(json!({ "error": "document has not passed validation" })),
        ));
    }

    let request = SubmitRequest {
        filename: session.filename.clone(),
        commit_msg: body.commit_msg,
        long_msg: body.long_msg,
        draft: body.draft,
        code: session.document.clone(),
        editor_type: session.editor_type,
    };
    let result = if session.existing {
        ctx.upstream.update_config(&request).await
    } else {
        ctx.upstream.add_config(&request).await
    };

    match result {
        Ok(response) => {
            ctx.sessions.mark_submitted(&id).await;
            info!(
                session_id = %id,
                filename = %session.filename,
                pr_url = %response.pr_info.html_url,
                "config submitted"
            );
            Ok(Json(json!({
                "prInfo": { "htmlUrl": response.pr_info.html_url },
            })))
        }
        Err(UpstreamError::Rejected { status, body }) => {
            warn!(session_id = %id, %status, "submission rejected");
            Err((
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": format!("config service rejected the submission ({status})"), "details": body })),
            ))
        }
        Err(e) => {
            warn!(session_id = %id, error = %e, "submission round-trip failed");
            Err((
                upstream_failure_status(&e),
                Json(json!({ "error": e.to_string() })),
            ))
        }
    }
}

/// A dead upstream is a different operational problem than a broken answer
/// from a live one: 503 for the former, 502 for the latter.
fn upstream_failure_status(e: &UpstreamError) -> StatusCode {
    match e {
        UpstreamError::Unreachable(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::BAD_GATEWAY,
    }
}
