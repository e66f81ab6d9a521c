#![deny(missing_docs)]

//! # Schema Nodes
//!
//! Immutable representation of one JSON-Schema-like fragment, as read from an
//! OpenAPI document. Nodes are produced once by [`parse`] and are never mutated
//! while compiling.

pub mod parse;

use indexmap::IndexMap;
use serde_json::{Number, Value};

pub use parse::schema_from_json;

/// The declared `type` of a schema.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SchemaKind {
    /// `string`
    String,
    /// `number`
    Number,
    /// `integer`
    Integer,
    /// `boolean`
    Boolean,
    /// `object`
    Object,
    /// `array`
    Array,
    /// `null`
    Null,
    /// No `type` keyword.
    #[default]
    Unspecified,
    /// A `type` value outside the JSON Schema set.
    Other(String),
}

impl SchemaKind {
    /// Maps a JSON Schema `type` string.
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "string" => SchemaKind::String,
            "number" => SchemaKind::Number,
            "integer" => SchemaKind::Integer,
            "boolean" => SchemaKind::Boolean,
            "object" => SchemaKind::Object,
            "array" => SchemaKind::Array,
            "null" => SchemaKind::Null,
            other => SchemaKind::Other(other.to_string()),
        }
    }
}

/// The `additionalProperties` keyword.
#[derive(Debug, Clone, PartialEq)]
pub enum AdditionalProperties {
    /// `true` / `false`.
    Allowed(bool),
    /// A schema every extra property must satisfy.
    Schema(Box<SchemaNode>),
}

/// One schema fragment.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaNode {
    /// Declared type.
    pub kind: SchemaKind,
    /// `nullable: true` (or an OAS 3.1 `null` member of `type`).
    pub nullable: bool,
    /// `enum` values in document order.
    pub enum_values: Option<Vec<Value>>,
    /// `const` value.
    pub const_value: Option<Value>,
    /// `format` annotation.
    pub format: Option<String>,
    /// Inclusive lower bound.
    pub minimum: Option<Number>,
    /// Inclusive upper bound.
    pub maximum: Option<Number>,
    /// Exclusive lower bound.
    pub exclusive_minimum: Option<Number>,
    /// Exclusive upper bound.
    pub exclusive_maximum: Option<Number>,
    /// `multipleOf`.
    pub multiple_of: Option<Number>,
    /// `minLength`.
    pub min_length: Option<u64>,
    /// `maxLength`.
    pub max_length: Option<u64>,
    /// `pattern` (ECMA-262 regex source).
    pub pattern: Option<String>,
    /// `minItems`.
    pub min_items: Option<u64>,
    /// `maxItems`.
    pub max_items: Option<u64>,
    /// Declared properties in document order.
    pub properties: IndexMap<String, SchemaNode>,
    /// `required` property names. Absent and empty are both represented as empty.
    pub required: Vec<String>,
    /// `additionalProperties`, when present.
    pub additional_properties: Option<AdditionalProperties>,
    /// Array `items`.
    pub items: Option<Box<SchemaNode>>,
    /// `allOf` members.
    pub all_of: Vec<SchemaNode>,
    /// `oneOf` members.
    pub one_of: Vec<SchemaNode>,
    /// `anyOf` members.
    pub any_of: Vec<SchemaNode>,
    /// `not` schema.
    pub not: Option<Box<SchemaNode>>,
    /// `$ref` pointer.
    pub reference: Option<String>,
    /// `default` value.
    pub default: Option<Value>,
    /// `description`.
    pub description: Option<String>,
    /// Keywords present on the fragment that the compiler does not model.
    pub unsupported: Vec<String>,
}

impl SchemaNode {
    /// A node with only a `type`.
    pub fn of_kind(kind: SchemaKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// A `$ref` node.
    pub fn reference(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
            ..Self::default()
        }
    }

    /// True when the node has any combinator keyword.
    pub fn is_composed(&self) -> bool {
        !self.all_of.is_empty()
            || !self.one_of.is_empty()
            || !self.any_of.is_empty()
            || self.not.is_some()
    }

    /// True when the node describes an object shape: `type: object`, or no type
    /// with object keywords present.
    pub fn has_object_shape(&self) -> bool {
        match self.kind {
            SchemaKind::Object => true,
            SchemaKind::Unspecified => {
                !self.properties.is_empty()
                    || self.additional_properties.is_some()
                    || !self.required.is_empty()
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_type_name() {
        assert_eq!(SchemaKind::from_type_name("integer"), SchemaKind::Integer);
        assert_eq!(
            SchemaKind::from_type_name("file"),
            SchemaKind::Other("file".into())
        );
    }

    #[test]
    fn test_object_shape_inference() {
        let mut node = SchemaNode::default();
        assert!(!node.has_object_shape());
        node.properties
            .insert("id".into(), SchemaNode::of_kind(SchemaKind::String));
        assert!(node.has_object_shape());
        assert!(SchemaNode::of_kind(SchemaKind::Object).has_object_shape());
        assert!(!SchemaNode::of_kind(SchemaKind::Array).has_object_shape());
    }
}
