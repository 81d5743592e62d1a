//! Editor session management.
//!
//! Each browser tab editing a config file holds one session.  A session owns
//! the working document, the schema driving completion, and the
//! validate-before-commit state machine: editing invalidates any earlier
//! validation, and only a successfully validated document may be submitted.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::completion::schema::{self, ConfigSchema};

/// Which config dialect the session edits.  Determines the completion schema
/// and the identifier key the precheck enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorType {
    Registry,
    Purl,
}

impl EditorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditorType::Registry => "registry",
            EditorType::Purl => "purl",
        }
    }

    /// The top-level key holding the config's identifier.
    pub fn idspace_key(&self) -> &'static str {
        match self {
            EditorType::Registry => "id",
            EditorType::Purl => "idspace",
        }
    }

    pub fn default_schema(&self) -> &'static ConfigSchema {
        match self {
            EditorType::Registry => schema::registry_default(),
            EditorType::Purl => schema::purl_default(),
        }
    }
}

/// Server-side state for one open editor.
#[derive(Debug, Clone)]
pub struct EditorSession {
    pub id: String,
    pub filename: String,
    pub editor_type: EditorType,
    /// True when editing an existing upstream file, false for a new one.
    /// Chooses between the update and add submission paths.
    pub existing: bool,
    pub schema: Arc<ConfigSchema>,
    pub document: String,
    /// Set on every document update, cleared on successful submission.
    pub has_changed: bool,
    /// True when the last validation ran against a draft submission.
    pub draft: bool,
    /// True only while the current document has passed validation.
    pub can_commit: bool,
    pub created_at: DateTime<Utc>,
}

/// Client-facing view of a session.  The schema and document travel on their
/// own endpoints, not here.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: String,
    pub filename: String,
    pub editor_type: EditorType,
    pub existing: bool,
    pub has_changed: bool,
    pub draft: bool,
    pub can_commit: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&EditorSession> for SessionView {
    fn from(s: &EditorSession) -> Self {
        Self {
            id: s.id.clone(),
            filename: s.filename.clone(),
            editor_type: s.editor_type,
            existing: s.existing,
            has_changed: s.has_changed,
            draft: s.draft,
            can_commit: s.can_commit,
            created_at: s.created_at,
        }
    }
}

/// Concurrent session registry keyed by session id.
pub struct SessionManager {
    max_sessions: usize,
    sessions: RwLock<HashMap<String, EditorSession>>,
}

impl SessionManager {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            max_sessions,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Open a new session.  A custom schema overrides the built-in one for
    /// the editor type.
    pub async fn create(
        &self,
        filename: String,
        editor_type: EditorType,
        existing: bool,
        document: String,
        custom_schema: Option<ConfigSchema>,
    ) -> Result<SessionView> {
        let mut sessions = self.sessions.write().await;
        if sessions.len() >= self.max_sessions {
            bail!("session limit reached ({} open)", self.max_sessions);
        }

        let schema = match custom_schema {
            Some(s) => Arc::new(s),
            None => Arc::new(editor_type.default_schema().clone()),
        };
        let session = EditorSession {
            id: Uuid::new_v4().to_string(),
            filename,
            editor_type,
            existing,
            schema,
            document,
            has_changed: false,
            draft: false,
            can_commit: false,
            created_at: Utc::now(),
        };
        info!(
            session_id = %session.id,
            filename = %session.filename,
            editor_type = session.editor_type.as_str(),
            existing = session.existing,
            "session opened"
        );
        let view = SessionView::from(&session);
        sessions.insert(session.id.clone(), session);
        Ok(view)
    }

    pub async fn get(&self, id: &str) -> Option<EditorSession> {
        self.sessions.read().await.get(id).cloned()
    }

    pub async fn view(&self, id: &str) -> Option<SessionView> {
        self.sessions.read().await.get(id).map(SessionView::from)
    }

    pub async fn list(&self) -> Vec<SessionView> {
        self.sessions
            .read()
            .await
            .values()
            .map(SessionView::from)
            .collect()
    }

    pub async fn delete(&self, id: &str) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            info!(session_id = %id, "session closed");
        }
        removed
    }

    /// Replace the working document.  Any prior validation no longer applies.
    pub async fn update_document(&self, id: &str, document: String) -> Option<SessionView> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(id)?;
        session.document = document;
        session.has_changed = true;
        session.draft = false;
        session.can_commit = false;
        Some(SessionView::from(&*session))
    }

    /// Record a validation outcome against the current document.
    pub async fn set_validation_state(
        &self,
        id: &str,
        can_commit: bool,
        draft: bool,
    ) -> Option<SessionView> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(id)?;
        session.can_commit = can_commit;
        session.draft = draft;
        Some(SessionView::from(&*session))
    }

    /// A pull request was opened for the current document.
    pub async fn mark_submitted(&self, id: &str) -> Option<SessionView> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(id)?;
        session.has_changed = false;
        session.can_commit = false;
        Some(SessionView::from(&*session))
    }
}
