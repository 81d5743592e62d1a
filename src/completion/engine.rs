// SPDX-License-Identifier: MIT
// Completion Generator — schema-driven candidate production for the YAML
// config editors.
//
// Dispatch is a fixed, ordered pattern-match on the text before the word
// under the cursor (`prev_string`) plus the resolved root context:
//
//   Tier 0  prev_string empty            → top-level keys
//   Tier 1  prev_string == "key: "       → enum values of that key
//   Tier 2  prev_string blank, context   → nested keys of the context
//   Tier 3  prev_string "  subkey: "     → grandchild keys / enum values
//
// The tiers are mutually exclusive.  Ordering within a tier follows schema
// declaration order; no other ranking is applied.  The generator never
// mutates the schema or the document, and it never fails: absent optional
// schema fields silently disable the branch that would have used them.

use serde::Serialize;

use super::context::{resolve_context, word_span};
use super::schema::{ConfigSchema, Property};

/// A single suggestion: what the user sees, and what replaces the word span
/// on acceptance (possibly multi-line).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub display_text: String,
    pub insertion_text: String,
}

impl Candidate {
    fn new(display: impl Into<String>, insertion: impl Into<String>) -> Self {
        Self {
            display_text: display.into(),
            insertion_text: insertion.into(),
        }
    }
}

/// Completion result: ordered candidates plus the character span on the
/// cursor line that an accepted candidate replaces.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Completion {
    pub candidates: Vec<Candidate>,
    pub replace_from: usize,
    pub replace_to: usize,
}

/// Context-sensitive help for the cursor position: the resolved root key and
/// its schema description, when the key is known to the schema.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextHelp {
    pub key: String,
    pub description: Option<String>,
}

/// Produce completion candidates for the given cursor position.
///
/// An empty word span means nothing is being typed: the result is an empty
/// list anchored at the cursor.
pub fn complete<S: AsRef<str>>(
    lines: &[S],
    cursor_line: usize,
    cursor_ch: usize,
    schema: &ConfigSchema,
) -> Completion {
    let line = lines.get(cursor_line).map(AsRef::as_ref).unwrap_or("");
    let (start, end) = word_span(line, cursor_ch);
    if start == end {
        return Completion {
            candidates: Vec::new(),
            replace_from: cursor_ch,
            replace_to: cursor_ch,
        };
    }

    let chars: Vec<char> = line.chars().collect();
    let word: String = chars[start..end].iter().collect();
    let prev: String = chars[..start].iter().collect();

    let raw = if prev.is_empty() {
        top_level_candidates(schema)
    } else if let Some(values) = enum_candidates(schema, &prev) {
        values
    } else if is_blank_prefix(&prev) {
        nested_candidates(schema, resolve_context(lines, cursor_line).as_deref(), &word)
    } else {
        deep_nested_candidates(schema, resolve_context(lines, cursor_line).as_deref(), &prev)
    };

    Completion {
        candidates: prune(raw, &word),
        replace_from: start,
        replace_to: end,
    }
}

/// Context-sensitive help while navigating: the nearest root key plus its
/// description from the schema.
pub fn describe_context<S: AsRef<str>>(
    lines: &[S],
    cursor_line: usize,
    schema: &ConfigSchema,
) -> Option<ContextHelp> {
    let key = resolve_context(lines, cursor_line)?;
    let prop = schema.properties.get(&key)?;
    Some(ContextHelp {
        description: prop.meta().description.clone(),
        key,
    })
}

/// Prefix-filter candidates against the typed word.
///
/// An empty filter result falls back to the full list (the user still sees
/// every legal option); a single match equal to the typed word yields nothing
/// (no self-suggestion).  Idempotent for a fixed word.
pub fn prune(candidates: Vec<Candidate>, word: &str) -> Vec<Candidate> {
    let matched: Vec<Candidate> = candidates
        .iter()
        .filter(|c| c.display_text.starts_with(word))
        .cloned()
        .collect();
    if matched.is_empty() {
        return candidates;
    }
    if matched.len() == 1 && matched[0].display_text == word {
        return Vec::new();
    }
    matched
}

/// Properties whose `suggest` flag is not explicitly false, in declaration
/// order.  All tiers draw from this set.
fn offered(schema: &ConfigSchema) -> impl Iterator<Item = (&String, &Property)> {
    schema.properties.iter().filter(|(_, p)| p.meta().suggest)
}

// ─── Tier 0: top-level keys ──────────────────────────────────────────────────

fn top_level_candidates(schema: &ConfigSchema) -> Vec<Candidate> {
    offered(schema)
        .map(|(key, prop)| {
            Candidate::new(
                format!("{key}:"),
                format!("{key}:{}", top_level_expansion(prop)),
            )
        })
        .collect()
}

/// Text appended after `key:` in a top-level suggestion, chosen by the first
/// matching rule:
///   1. explicit `suggestion`, formatted per type
///   2. array-of-objects → `- ` plus each item key on a continuation
///   3. bare array → `- ` continuation
///   4. object with properties → each sub-key on an indented continuation
///   5. bare object → blank continuation
///   6. enum string → first enum value
///   7. anything else → a single trailing space
fn top_level_expansion(prop: &Property) -> String {
    if let Some(sugg) = prop.meta().suggestion.as_deref() {
        return match prop {
            Property::Array(_) => format!("\n- {sugg}"),
            Property::Object(_) => format!("\n  {sugg}"),
            _ => format!(" {sugg}"),
        };
    }
    match prop {
        Property::Array(_) => match prop.item_properties() {
            Some(subs) => {
                let mut out = String::from("\n- ");
                for name in subs.keys() {
                    out.push_str(name);
                    out.push_str(": \n  ");
                }
                out
            }
            None => "\n- ".to_string(),
        },
        Property::Object(o) => match &o.properties {
            Some(subs) => {
                let mut out = String::from("\n  ");
                for name in subs.keys() {
                    out.push_str(name);
                    out.push_str(": \n  ");
                }
                out
            }
            None => " \n ".to_string(),
        },
        Property::String(_) => match prop.first_allowed() {
            Some(first) => format!(" {first}"),
            None => " ".to_string(),
        },
        Property::Opaque(_) => " ".to_string(),
    }
}

// ─── Tier 1: enum values after "key: " ───────────────────────────────────────

/// When `prev` is exactly `"key: "` for a schema key, that key owns the
/// completion: enum values for enum-bearing strings, nothing for any other
/// descriptor shape.
fn enum_candidates(schema: &ConfigSchema, prev: &str) -> Option<Vec<Candidate>> {
    for (key, prop) in offered(schema) {
        if prev == format!("{key}: ") {
            let values = prop
                .allowed()
                .map(|vals| {
                    vals.iter()
                        .map(|v| Candidate::new(v.clone(), v.clone()))
                        .collect()
                })
                .unwrap_or_default();
            return Some(values);
        }
    }
    None
}

// ─── Tier 2: nested keys under the resolved context ──────────────────────────

/// The whitespace-only shapes that precede a nested key: `"- "`, runs of
/// spaces, or any all-whitespace prefix.
fn is_blank_prefix(prev: &str) -> bool {
    if prev.is_empty() {
        return false;
    }
    if let Some(rest) = prev.strip_prefix('-') {
        return !rest.is_empty() && rest.chars().all(char::is_whitespace);
    }
    prev.chars().all(char::is_whitespace)
}

fn nested_candidates(schema: &ConfigSchema, context: Option<&str>, word: &str) -> Vec<Candidate> {
    let Some(context) = context else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for (key, prop) in offered(schema) {
        if key != context {
            continue;
        }
        match prop {
            Property::Object(_) => {
                if let Some(subs) = prop.sub_properties() {
                    for name in subs.keys() {
                        out.push(Candidate::new(format!("{name}:"), format!("{name}: ")));
                    }
                }
            }
            Property::Array(_) => {
                if let Some(subs) = prop.item_properties() {
                    for (name, sub) in subs {
                        out.push(item_key_candidate(name, sub));
                    }
                }
            }
            _ => {
                // A key with neither structure nor enum may still carry a
                // literal suggestion; skip it once the word already begins
                // with that suggestion.
                if let Some(sugg) = prop.meta().suggestion.as_deref() {
                    if !word.starts_with(sugg) {
                        out.push(Candidate::new(sugg, sugg));
                    }
                }
            }
        }
    }
    out
}

/// Render an array-item key according to the sub-property's own type:
/// enum string → `name: firstValue`; nested array-of-objects → a multi-line
/// block listing each grandchild key; anything else → `name: `.
fn item_key_candidate(name: &str, sub: &Property) -> Candidate {
    let display = format!("{name}:");
    if let Some(first) = sub.first_allowed() {
        return Candidate::new(display, format!("{name}: {first}"));
    }
    if let Some(grand) = sub.item_properties() {
        let mut text = format!("{name}: \n");
        for grandchild in grand.keys() {
            text.push_str("  ");
            text.push_str(grandchild);
            text.push_str(": \n");
        }
        return Candidate::new(display, text);
    }
    Candidate::new(display, format!("{name}: "))
}

// ─── Tier 3: deep nesting inside array items ─────────────────────────────────

/// Matches `^\s+<key>:\s+$` — the cursor sits in the value position of an
/// indented `key:` line.
fn at_nested_value(prev: &str, key: &str) -> bool {
    let trimmed = prev.trim_start();
    if trimmed.len() == prev.len() {
        return false; // no leading whitespace
    }
    let Some(rest) = trimmed.strip_prefix(key).and_then(|r| r.strip_prefix(':')) else {
        return false;
    };
    !rest.is_empty() && rest.chars().all(char::is_whitespace)
}

/// For array-of-object keys, complete the value position of an item
/// sub-property: grandchild key names when the sub-property is itself an
/// array of objects, enum values when it is an enum-bearing string.
fn deep_nested_candidates(
    schema: &ConfigSchema,
    context: Option<&str>,
    prev: &str,
) -> Vec<Candidate> {
    let Some(context) = context else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for (key, prop) in offered(schema) {
        if key != context {
            continue;
        }
        let Some(subs) = prop.item_properties() else {
            continue;
        };
        for (name, sub) in subs {
            if !at_nested_value(prev, name) {
                continue;
            }
            if let Some(grand) = sub.item_properties() {
                for grandchild in grand.keys() {
                    out.push(Candidate::new(
                        format!("{grandchild}:"),
                        format!("{grandchild}: "),
                    ));
                }
            } else if let Some(values) = sub.allowed() {
                for v in values {
                    out.push(Candidate::new(v.clone(), v.clone()));
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(json: &str) -> ConfigSchema {
        serde_json::from_str(json).unwrap()
    }

    fn displays(completion: &Completion) -> Vec<&str> {
        completion
            .candidates
            .iter()
            .map(|c| c.display_text.as_str())
            .collect()
    }

    #[test]
    fn empty_span_yields_empty_result_anchored_at_cursor() {
        let s = schema(r#"{"properties": {"idspace": {"type": "string"}}}"#);
        let out = complete(&["- ", ""], 0, 2, &s);
        assert!(out.candidates.is_empty());
        assert_eq!((out.replace_from, out.replace_to), (2, 2));
    }

    #[test]
    fn top_level_array_of_objects_expands_item_keys() {
        let s = schema(
            r#"{"properties": {
                "idspace": {"type": "string"},
                "entries": {"type": "array",
                            "items": {"type": "object",
                                      "properties": {"exact": {"type": "string"},
                                                     "replacement": {"type": "string"}}}}}}"#,
        );
        // Typed word matches nothing, so the full tier-0 list comes back.
        let out = complete(&["q"], 0, 1, &s);
        assert_eq!(
            out.candidates,
            vec![
                Candidate::new("idspace:", "idspace: "),
                Candidate::new("entries:", "entries:\n- exact: \n  replacement: \n  "),
            ]
        );
        assert_eq!((out.replace_from, out.replace_to), (0, 1));
    }

    #[test]
    fn top_level_suggestion_formats_per_type() {
        let s = schema(
            r#"{"properties": {
                "base_url": {"type": "string", "suggestion": "/obo/"},
                "imports": {"type": "array", "suggestion": "none"},
                "contact": {"type": "object", "suggestion": "label: "}}}"#,
        );
        let out = complete(&["q"], 0, 1, &s);
        assert_eq!(out.candidates[0].insertion_text, "base_url: /obo/");
        assert_eq!(out.candidates[1].insertion_text, "imports:\n- none");
        assert_eq!(out.candidates[2].insertion_text, "contact:\n  label: ");
    }

    #[test]
    fn top_level_defaults_for_remaining_shapes() {
        let s = schema(
            r#"{"properties": {
                "tags": {"type": "array"},
                "meta": {"type": "object"},
                "status": {"type": "string", "enum": ["active", "inactive"]},
                "note": {"type": "string"},
                "weird": {}}}"#,
        );
        let out = complete(&["q"], 0, 1, &s);
        let texts: Vec<&str> = out.candidates.iter().map(|c| c.insertion_text.as_str()).collect();
        assert_eq!(
            texts,
            ["tags:\n- ", "meta: \n ", "status: active", "note: ", "weird: "]
        );
    }

    #[test]
    fn suggest_false_keys_are_hidden() {
        let s = schema(
            r#"{"properties": {
                "id": {"type": "string"},
                "layout": {"type": "string", "suggest": false}}}"#,
        );
        let out = complete(&["q"], 0, 1, &s);
        assert_eq!(displays(&out), ["id:"]);
    }

    #[test]
    fn enum_values_after_key_colon_space() {
        let s = schema(
            r#"{"properties": {"term_browser": {"type": "string", "enum": ["ontobee", "custom"]}}}"#,
        );
        let out = complete(&["term_browser: o"], 0, 15, &s);
        assert_eq!(
            out.candidates,
            vec![Candidate::new("ontobee", "ontobee")]
        );
        assert_eq!((out.replace_from, out.replace_to), (14, 15));
    }

    #[test]
    fn enum_tier_preserves_declaration_order_on_fallback() {
        let s = schema(
            r#"{"properties": {"idspace": {"type": "string", "enum": ["A", "B"]}}}"#,
        );
        // "z" matches neither value — pruning falls back to the full list.
        let out = complete(&["idspace: z"], 0, 10, &s);
        assert_eq!(displays(&out), ["A", "B"]);
    }

    #[test]
    fn nested_keys_from_context_object() {
        let s = schema(
            r#"{"properties": {
                "contact": {"type": "object",
                            "properties": {"label": {"type": "string"},
                                           "email": {"type": "string"}}}}}"#,
        );
        let out = complete(&["contact:", "  l"], 1, 3, &s);
        assert_eq!(
            out.candidates,
            vec![Candidate::new("label:", "label: ")]
        );
    }

    #[test]
    fn nested_keys_from_context_array_items() {
        let s = schema(
            r#"{"properties": {
                "entries": {"type": "array",
                            "items": {"type": "object",
                                      "properties": {
                                          "exact": {"type": "string"},
                                          "status": {"type": "string",
                                                     "enum": ["permanent", "temporary"]},
                                          "tests": {"type": "array",
                                                    "items": {"type": "object",
                                                              "properties": {
                                                                  "from": {"type": "string"},
                                                                  "to": {"type": "string"}}}}}}}}}"#,
        );
        let out = complete(&["entries:", "- q"], 1, 3, &s);
        assert_eq!(
            out.candidates,
            vec![
                Candidate::new("exact:", "exact: "),
                Candidate::new("status:", "status: permanent"),
                Candidate::new("tests:", "tests: \n  from: \n  to: \n"),
            ]
        );
    }

    #[test]
    fn nested_tier_omits_keys_absent_from_items() {
        let s = schema(
            r#"{"properties": {
                "entries": {"type": "array",
                            "items": {"type": "object",
                                      "properties": {"replacement": {"type": "string"}}}}}}"#,
        );
        let out = complete(&["entries:", "  r"], 1, 3, &s);
        assert_eq!(displays(&out), ["replacement:"]);
    }

    #[test]
    fn nested_array_without_item_properties_is_silent() {
        let s = schema(r#"{"properties": {"example_terms": {"type": "array"}}}"#);
        let out = complete(&["example_terms:", "- G"], 1, 3, &s);
        assert!(out.candidates.is_empty());
    }

    #[test]
    fn suggestion_only_key_offered_until_typed() {
        let s = schema(
            r#"{"properties": {"base_url": {"type": "string", "suggestion": "/obo/"}}}"#,
        );
        // Not yet typed: offered.
        let out = complete(&["base_url: x", "  q"], 1, 3, &s);
        assert_eq!(displays(&out), ["/obo/"]);
        // Word already starts with the suggestion: withheld.
        let out = complete(&["base_url: x", "  /obo/g"], 1, 7, &s);
        assert!(out.candidates.is_empty());
    }

    #[test]
    fn deep_nested_grandchild_keys() {
        let s = schema(
            r#"{"properties": {
                "entries": {"type": "array",
                            "items": {"type": "object",
                                      "properties": {
                                          "tests": {"type": "array",
                                                    "items": {"type": "object",
                                                              "properties": {
                                                                  "from": {"type": "string"},
                                                                  "to": {"type": "string"}}}}}}}}}"#,
        );
        let out = complete(&["entries:", "- exact: /x", "  tests: q"], 2, 10, &s);
        assert_eq!(
            out.candidates,
            vec![
                Candidate::new("from:", "from: "),
                Candidate::new("to:", "to: "),
            ]
        );
    }

    #[test]
    fn deep_nested_enum_values() {
        let s = schema(
            r#"{"properties": {
                "entries": {"type": "array",
                            "items": {"type": "object",
                                      "properties": {
                                          "status": {"type": "string",
                                                     "enum": ["permanent", "temporary"]}}}}}}"#,
        );
        let out = complete(&["entries:", "  status: p"], 1, 11, &s);
        assert_eq!(displays(&out), ["permanent"]);
    }

    #[test]
    fn deep_nested_requires_matching_context() {
        let s = schema(
            r#"{"properties": {
                "products": {"type": "string"},
                "entries": {"type": "array",
                            "items": {"type": "object",
                                      "properties": {
                                          "status": {"type": "string",
                                                     "enum": ["permanent"]}}}}}}"#,
        );
        // Context resolves to "products", not "entries".
        let out = complete(&["products: x", "  status: p"], 1, 11, &s);
        assert!(out.candidates.is_empty());
    }

    #[test]
    fn prefix_pruning_keeps_only_matches() {
        let s = schema(
            r#"{"properties": {
                "idspace": {"type": "string"},
                "entries": {"type": "array"}}}"#,
        );
        let out = complete(&["id"], 0, 2, &s);
        assert_eq!(displays(&out), ["idspace:"]);
    }

    #[test]
    fn exact_single_match_suggests_nothing() {
        let s = schema(r#"{"properties": {"idspace": {"type": "string"}}}"#);
        let out = complete(&["idspace:"], 0, 8, &s);
        // The typed word "idspace:" equals the only candidate's label.
        assert!(out.candidates.is_empty());
    }

    #[test]
    fn describe_context_returns_schema_description() {
        let s = schema(
            r#"{"properties": {"entries": {"type": "array", "description": "Redirect entries."}}}"#,
        );
        let help = describe_context(&["entries:", "- exact: /x"], 1, &s).unwrap();
        assert_eq!(help.key, "entries");
        assert_eq!(help.description.as_deref(), Some("Redirect entries."));
        assert!(describe_context(&["  indented: x"], 0, &s).is_none());
    }
}
