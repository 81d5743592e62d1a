//! Identifier precheck run before any upstream round-trip.
//!
//! Every config must carry an identifier key whose value matches the file it
//! lives in: registry files declare `id: <stem>`, PURL files declare
//! `idspace: <STEM>` uppercased.  Catching a mismatch locally avoids an
//! upstream pull request that reviewers would bounce anyway.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::session::EditorType;

static ID_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*id:[ \t]+(.+?)[ \t]*\r?$").unwrap());
static IDSPACE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*idspace:[ \t]+(.+?)[ \t]*\r?$").unwrap());

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PrecheckError {
    #[error("'{key}: ' is required")]
    Missing { key: &'static str },
    #[error("'{key}: {actual}' does not match the expected value: '{expected}'")]
    Mismatch {
        key: &'static str,
        actual: String,
        expected: String,
    },
}

/// The identifier value the filename implies.
pub fn expected_idspace(filename: &str, editor_type: EditorType) -> String {
    let stem = filename
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(filename);
    match editor_type {
        EditorType::Registry => stem.to_string(),
        EditorType::Purl => stem.to_uppercase(),
    }
}

/// Verify the document's identifier line against the filename.
pub fn check(code: &str, filename: &str, editor_type: EditorType) -> Result<(), PrecheckError> {
    let key = editor_type.idspace_key();
    let pattern = match editor_type {
        EditorType::Registry => &*ID_LINE,
        EditorType::Purl => &*IDSPACE_LINE,
    };
    let Some(captures) = pattern.captures(code) else {
        return Err(PrecheckError::Missing { key });
    };
    let actual = &captures[1];
    let expected = expected_idspace(filename, editor_type);
    if actual != expected {
        return Err(PrecheckError::Mismatch {
            key,
            actual: actual.to_string(),
            expected,
        });
    }
    Ok(())
}
