#![deny(missing_docs)]

//! # Endpoint Descriptors
//!
//! - **binder**: maps operations onto descriptors through the shared translator.
//! - **naming**: alias derivation for operations without `operationId`.

pub mod binder;
pub mod naming;

pub use binder::EndpointBinder;

use crate::ir::ValidationExpr;
use crate::oas::models::{HttpMethod, ParamLocation};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// How the request body is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RequestFormat {
    /// `application/json` and `+json` media types.
    #[default]
    #[serde(rename = "json")]
    Json,
    /// `multipart/*`.
    #[serde(rename = "form-data")]
    FormData,
    /// `application/x-www-form-urlencoded`.
    #[serde(rename = "form-url")]
    FormUrl,
    /// `application/octet-stream`.
    #[serde(rename = "binary")]
    Binary,
    /// `text/*`.
    #[serde(rename = "text")]
    Text,
}

impl RequestFormat {
    /// Classifies a media type. Parameters after `;` are ignored; unknown types are JSON.
    pub fn from_media_type(media_type: Option<&str>) -> Self {
        let Some(media_type) = media_type else {
            return RequestFormat::Json;
        };
        let essence = media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if essence.starts_with("multipart/") {
            RequestFormat::FormData
        } else if essence == "application/x-www-form-urlencoded" {
            RequestFormat::FormUrl
        } else if essence == "application/octet-stream" {
            RequestFormat::Binary
        } else if essence.starts_with("text/") {
            RequestFormat::Text
        } else {
            RequestFormat::Json
        }
    }
}

/// A response status key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseStatus {
    /// A concrete code such as `404`.
    Code(u16),
    /// A range such as `4XX`; holds the leading digit.
    Range(u16),
    /// The `default` response.
    Default,
}

impl ResponseStatus {
    /// Parses `200`, `4XX` / `4xx` or `default`.
    pub fn parse(key: &str) -> Option<Self> {
        if key == "default" {
            return Some(ResponseStatus::Default);
        }
        let bytes = key.as_bytes();
        if bytes.len() != 3 || !(b'1'..=b'5').contains(&bytes[0]) {
            return None;
        }
        if key[1..].eq_ignore_ascii_case("XX") {
            return Some(ResponseStatus::Range(u16::from(bytes[0] - b'0')));
        }
        key.parse().ok().map(ResponseStatus::Code)
    }

    /// `2xx` code or the `2XX` range.
    pub fn is_success(&self) -> bool {
        match self {
            ResponseStatus::Code(code) => (200..300).contains(code),
            ResponseStatus::Range(class) => *class == 2,
            ResponseStatus::Default => false,
        }
    }

    /// `4xx`/`5xx` codes and ranges.
    pub fn is_client_or_server_error(&self) -> bool {
        match self {
            ResponseStatus::Code(code) => (400..600).contains(code),
            ResponseStatus::Range(class) => *class == 4 || *class == 5,
            ResponseStatus::Default => false,
        }
    }

    /// Numeric ascending; a range sorts after the codes it covers; `default` is last.
    fn sort_key(&self) -> (u16, u8) {
        match self {
            ResponseStatus::Code(code) => (*code, 0),
            ResponseStatus::Range(class) => (class * 100 + 99, 1),
            ResponseStatus::Default => (u16::MAX, 2),
        }
    }
}

impl Ord for ResponseStatus {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for ResponseStatus {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseStatus::Code(code) => write!(f, "{}", code),
            ResponseStatus::Range(class) => write!(f, "{}XX", class),
            ResponseStatus::Default => f.write_str("default"),
        }
    }
}

/// Codes serialize as numbers; ranges and `default` as strings.
impl Serialize for ResponseStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ResponseStatus::Code(code) => serializer.serialize_u16(*code),
            other => serializer.collect_str(other),
        }
    }
}

/// One bound parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointParameter {
    /// Parameter name; `body` for the request body.
    pub name: String,
    /// Location.
    pub location: ParamLocation,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Value expression.
    pub schema: ValidationExpr,
}

/// A non-success response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    /// Status key.
    pub status: ResponseStatus,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Payload expression (`void` without content).
    pub schema: ValidationExpr,
}

/// The compiled request/response typing of one operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDescriptor {
    /// HTTP method.
    pub method: HttpMethod,
    /// Path template.
    pub path: String,
    /// `operationId` or a derived alias; absent when aliases are disabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Summary, or description when there is no summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Request body encoding.
    pub request_format: RequestFormat,
    /// Parameters: body first, then declared parameters in order.
    pub parameters: Vec<EndpointParameter>,
    /// Success response expression.
    pub response: ValidationExpr,
    /// Error responses sorted by status.
    pub errors: Vec<ErrorResponse>,
    /// Operation is deprecated.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,
}
