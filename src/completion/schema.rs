// SPDX-License-Identifier: MIT
// Schema model for the YAML config editors.
//
// A trimmed-down, read-only mirror of the JSON-Schema vocabulary the editor
// pages ship (`properties` / `items` / `enum`), plus the editor-specific
// annotations `suggestion` and `suggest`.  The schema is trusted input: it is
// supplied once per editing session and never validated itself.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer};

/// Top-level schema: an ordered map of root property descriptors.
///
/// Candidate ordering follows declaration order of `properties`, so the map
/// must preserve insertion order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigSchema {
    #[serde(default)]
    pub properties: IndexMap<String, Property>,
}

/// Annotations common to every descriptor regardless of its `type`.
#[derive(Debug, Clone, Default)]
pub struct Meta {
    /// Human-readable help text shown next to the editor.
    pub description: Option<String>,
    /// Literal default value or snippet used in top-level suggestions.
    pub suggestion: Option<String>,
    /// Whether to offer this key at all (default true).
    pub suggest: bool,
}

/// A property descriptor, tagged by its JSON-Schema `type`.
///
/// A descriptor with a missing or unrecognized `type` becomes
/// [`Property::Opaque`]: it matches no rendering branch and only receives the
/// bare-space default in top-level completion.
#[derive(Debug, Clone)]
pub enum Property {
    String(StringProp),
    Object(ObjectProp),
    Array(ArrayProp),
    Opaque(Meta),
}

#[derive(Debug, Clone, Default)]
pub struct StringProp {
    pub meta: Meta,
    /// Ordered list of allowed values (JSON-Schema `enum`).
    pub allowed: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct ObjectProp {
    pub meta: Meta,
    pub properties: Option<IndexMap<String, Property>>,
}

#[derive(Debug, Clone, Default)]
pub struct ArrayProp {
    pub meta: Meta,
    /// Descriptor of the array's elements — itself a full descriptor, which is
    /// what makes array-of-object items and one further nested array level work.
    pub items: Option<Box<Property>>,
}

impl Property {
    pub fn meta(&self) -> &Meta {
        match self {
            Property::String(p) => &p.meta,
            Property::Object(p) => &p.meta,
            Property::Array(p) => &p.meta,
            Property::Opaque(meta) => meta,
        }
    }

    /// Direct sub-properties, for `object` descriptors that declare them.
    pub fn sub_properties(&self) -> Option<&IndexMap<String, Property>> {
        match self {
            Property::Object(o) => o.properties.as_ref(),
            _ => None,
        }
    }

    /// Item sub-properties, for `array` descriptors whose `items` is an object
    /// with its own `properties`.  Anything else short-circuits to `None`.
    pub fn item_properties(&self) -> Option<&IndexMap<String, Property>> {
        match self {
            Property::Array(a) => match a.items.as_deref() {
                Some(Property::Object(o)) => o.properties.as_ref(),
                _ => None,
            },
            _ => None,
        }
    }

    /// The `enum` list, for `string` descriptors that carry one.
    pub fn allowed(&self) -> Option<&[String]> {
        match self {
            Property::String(s) => s.allowed.as_deref(),
            _ => None,
        }
    }

    /// First enum value, if this is an enum-bearing string.
    pub fn first_allowed(&self) -> Option<&str> {
        self.allowed().and_then(|v| v.first()).map(String::as_str)
    }
}

// ─── Deserialization ─────────────────────────────────────────────────────────
//
// The wire shape is plain JSON-Schema, so descriptors are read through a raw
// mirror struct and converted.  Unknown `type` strings degrade to `Opaque`
// rather than erroring — the schema is trusted, not validated.

#[derive(Default, Deserialize)]
#[serde(default)]
struct RawProperty {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(rename = "enum")]
    allowed: Option<Vec<String>>,
    suggestion: Option<String>,
    suggest: Option<bool>,
    description: Option<String>,
    properties: Option<IndexMap<String, Property>>,
    items: Option<Box<Property>>,
}

impl From<RawProperty> for Property {
    fn from(raw: RawProperty) -> Self {
        let meta = Meta {
            description: raw.description,
            suggestion: raw.suggestion,
            suggest: raw.suggest.unwrap_or(true),
        };
        match raw.kind.as_deref() {
            Some("string") => Property::String(StringProp {
                meta,
                allowed: raw.allowed,
            }),
            Some("object") => Property::Object(ObjectProp {
                meta,
                properties: raw.properties,
            }),
            Some("array") => Property::Array(ArrayProp {
                meta,
                items: raw.items,
            }),
            _ => Property::Opaque(meta),
        }
    }
}

impl<'de> Deserialize<'de> for Property {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(RawProperty::deserialize(deserializer)?.into())
    }
}

// ─── Built-in schemas ────────────────────────────────────────────────────────

/// Raw built-in schema for PURL redirect configs.
pub const PURL_SCHEMA_JSON: &str = include_str!("schemas/purl.schema.json");
/// Raw built-in schema for ontology registry configs.
pub const REGISTRY_SCHEMA_JSON: &str = include_str!("schemas/registry.schema.json");

static PURL_SCHEMA: Lazy<ConfigSchema> = Lazy::new(|| {
    serde_json::from_str(PURL_SCHEMA_JSON).expect("embedded purl schema is valid JSON")
});

static REGISTRY_SCHEMA: Lazy<ConfigSchema> = Lazy::new(|| {
    serde_json::from_str(REGISTRY_SCHEMA_JSON).expect("embedded registry schema is valid JSON")
});

/// Built-in schema for PURL sessions opened without an explicit schema.
pub fn purl_default() -> &'static ConfigSchema {
    &PURL_SCHEMA
}

/// Built-in schema for registry sessions opened without an explicit schema.
pub fn registry_default() -> &'static ConfigSchema {
    &REGISTRY_SCHEMA
}
