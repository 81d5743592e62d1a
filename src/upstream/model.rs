// Wire types for the upstream config service.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    Error,
    Warning,
    Info,
}

/// A validation finding reported by the upstream service.  The service omits
/// `result_type` on some paths and uses non-positive line numbers to mean
/// "no particular line"; the accessors normalize both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    #[serde(default)]
    pub result_type: Option<ResultType>,
    #[serde(default)]
    pub line_number: Option<i64>,
    pub summary: String,
    #[serde(default)]
    pub details: Option<String>,
}

impl ValidationReport {
    /// Severity, treating an absent `result_type` as an error.
    pub fn severity(&self) -> ResultType {
        self.result_type.unwrap_or(ResultType::Error)
    }

    /// The 1-based line the finding points at, when it points at one.
    pub fn line(&self) -> Option<u64> {
        self.line_number.filter(|&n| n > 0).map(|n| n as u64)
    }
}

#[derive(Debug, Clone)]
pub enum ValidationOutcome {
    Valid,
    Report(ValidationReport),
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrInfo {
    pub html_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    pub pr_info: PrInfo,
}
