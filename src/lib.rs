//! purled — backend daemon for the OBO registry and PURL config editors.
//!
//! Serves a small REST API that browser editors use for context-sensitive
//! YAML completion, document sessions, and validated submission of config
//! changes to the upstream config service.

pub mod completion;
pub mod config;
pub mod rest;
pub mod session;
pub mod upstream;

use std::sync::Arc;
use std::time::Instant;

use config::DaemonConfig;
use session::SessionManager;
use upstream::UpstreamClient;

/// Shared state handed to every route handler.
pub struct AppContext {
    pub config: Arc<DaemonConfig>,
    pub sessions: Arc<SessionManager>,
    pub upstream: Arc<UpstreamClient>,
    pub started_at: Instant,
}
