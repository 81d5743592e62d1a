// SPDX-License-Identifier: MIT
// Wire types for the completion endpoints.

use serde::Deserialize;

/// Body of `POST /sessions/{id}/complete`.  The optional `document` lets the
/// client complete against unsaved buffer contents without a separate
/// document update round-trip.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    pub cursor_line: usize,
    pub cursor_ch: usize,
    #[serde(default)]
    pub document: Option<String>,
}

/// Query string of `GET /sessions/{id}/help`.
#[derive(Debug, Deserialize)]
pub struct HelpQuery {
    pub line: usize,
}
