#![deny(missing_docs)]

//! # Document Shims
//!
//! Intermediate deserialization layer mapping directly onto OpenAPI objects.
//!
//! Schema fragments stay raw JSON here; they are converted to
//! [`SchemaNode`](crate::schema::SchemaNode)s by the document loader so that
//! conversion warnings carry accurate locations. Every map preserves document
//! order.

use crate::oas::models::HttpMethod;
use indexmap::IndexMap;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Root OpenAPI document.
#[derive(Debug, Deserialize)]
pub struct ShimOpenApi {
    /// OpenAPI version (e.g. "3.1.0"). An unquoted `3.1` is accepted.
    #[serde(default, deserialize_with = "version_string")]
    pub openapi: Option<String>,

    /// Swagger version, for legacy documents.
    #[serde(default, deserialize_with = "version_string")]
    pub swagger: Option<String>,

    /// The `$self` keyword (OAS 3.2+): base URI of the document.
    #[serde(rename = "$self")]
    pub self_uri: Option<String>,

    /// Path items keyed by path template.
    #[serde(default)]
    pub paths: IndexMap<String, Value>,

    /// Reusable components.
    #[serde(default)]
    pub components: ShimComponents,
}

/// Reads a version field written as a string or as a bare YAML number.
fn version_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(version)) => Some(version),
        Some(other) => Some(other.to_string()),
    })
}

/// Components object holding reusable definitions.
#[derive(Debug, Default, Deserialize)]
pub struct ShimComponents {
    /// Named schemas.
    #[serde(default)]
    pub schemas: IndexMap<String, Value>,
    /// Reusable parameters.
    #[serde(default)]
    pub parameters: IndexMap<String, Value>,
    /// Reusable request bodies.
    #[serde(rename = "requestBodies", default)]
    pub request_bodies: IndexMap<String, Value>,
    /// Reusable responses.
    #[serde(default)]
    pub responses: IndexMap<String, Value>,
}

impl ShimComponents {
    /// Returns the raw section map for `section` (`parameters`, `requestBodies`, `responses`).
    pub fn section(&self, section: &str) -> Option<&IndexMap<String, Value>> {
        match section {
            "schemas" => Some(&self.schemas),
            "parameters" => Some(&self.parameters),
            "requestBodies" => Some(&self.request_bodies),
            "responses" => Some(&self.responses),
            _ => None,
        }
    }
}

/// A Path Item with its operations in document order.
#[derive(Debug, Default)]
pub struct ShimPathItem {
    /// Parameters shared by every operation of the path.
    pub parameters: Vec<Value>,
    /// Operations keyed by method, in document order.
    pub operations: Vec<(HttpMethod, ShimOperation)>,
}

impl<'de> Deserialize<'de> for ShimPathItem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
        let mut item = ShimPathItem::default();

        for (key, value) in raw {
            if key == "parameters" {
                item.parameters = serde_json::from_value(value).map_err(|e| {
                    DeError::custom(format!("Failed to parse path parameters: {}", e))
                })?;
                continue;
            }
            let Some(method) = HttpMethod::from_key(&key) else {
                continue;
            };
            let operation = serde_json::from_value::<ShimOperation>(value).map_err(|e| {
                DeError::custom(format!("Failed to parse operation '{}': {}", key, e))
            })?;
            item.operations.push((method, operation));
        }

        Ok(item)
    }
}

/// An Operation Object.
#[derive(Debug, Default, Deserialize)]
pub struct ShimOperation {
    /// Unique operation identifier.
    #[serde(rename = "operationId")]
    pub operation_id: Option<String>,
    /// Short summary.
    pub summary: Option<String>,
    /// Long description.
    pub description: Option<String>,
    /// Parameters (inline or `$ref`).
    #[serde(default)]
    pub parameters: Vec<Value>,
    /// Request body (inline or `$ref`).
    #[serde(rename = "requestBody")]
    pub request_body: Option<Value>,
    /// Responses keyed by status code, range (`4XX`) or `default`.
    #[serde(default)]
    pub responses: IndexMap<String, Value>,
    /// Deprecation flag.
    #[serde(default)]
    pub deprecated: bool,
}

/// A Parameter Object.
#[derive(Debug, Deserialize)]
pub struct ShimParameter {
    /// Parameter name.
    pub name: String,
    /// Location (`path`, `query`, `header`, `cookie`).
    #[serde(rename = "in")]
    pub parameter_in: String,
    /// Description.
    pub description: Option<String>,
    /// Whether the parameter is mandatory.
    #[serde(default)]
    pub required: bool,
    /// Schema of the value.
    pub schema: Option<Value>,
    /// Alternative to `schema`: a single-entry media type map.
    #[serde(default)]
    pub content: IndexMap<String, ShimMediaType>,
}

/// A Request Body Object.
#[derive(Debug, Deserialize)]
pub struct ShimRequestBody {
    /// Description.
    pub description: Option<String>,
    /// Body media types.
    #[serde(default)]
    pub content: IndexMap<String, ShimMediaType>,
    /// Whether the body is mandatory.
    #[serde(default)]
    pub required: bool,
}

/// A Response Object.
#[derive(Debug, Deserialize)]
pub struct ShimResponse {
    /// Description.
    pub description: Option<String>,
    /// Response media types.
    #[serde(default)]
    pub content: IndexMap<String, ShimMediaType>,
}

/// A Media Type Object.
#[derive(Debug, Clone, Deserialize)]
pub struct ShimMediaType {
    /// Payload schema.
    pub schema: Option<Value>,
}

/// Selects the most appropriate media type.
///
/// Preference order:
/// 1. `application/json`
/// 2. Any `+json` media type (e.g. `application/vnd.api+json`)
/// 3. `application/*`
/// 4. `*/*`
/// 5. First available entry
pub fn select_media_type(content: &IndexMap<String, ShimMediaType>) -> Option<(&str, &ShimMediaType)> {
    let pick = |key: &str| content.get_key_value(key).map(|(k, v)| (k.as_str(), v));

    pick("application/json")
        .or_else(|| {
            content
                .iter()
                .find(|(k, _)| k.ends_with("+json"))
                .map(|(k, v)| (k.as_str(), v))
        })
        .or_else(|| pick("application/*"))
        .or_else(|| pick("*/*"))
        .or_else(|| content.iter().next().map(|(k, v)| (k.as_str(), v)))
}
