#![deny(missing_docs)]

//! # Schema Normalization
//!
//! Converts raw JSON schema fragments into [`SchemaNode`]s.
//!
//! The conversion folds the dialect differences between OpenAPI 3.0 and 3.1 into
//! one shape:
//! - boolean schemas: `true` accepts anything, `false` becomes `not: {}`
//! - `type: [T, "null"]` and `x-nullable` become `nullable`
//! - multi-type arrays become an `anyOf` of single-type copies
//! - boolean `exclusiveMinimum` / `exclusiveMaximum` move the matching bound
//!
//! Constraint values of the wrong JSON type are dropped and reported as
//! `MalformedConstraint` warnings; conversion never fails.

use crate::error::{CompileWarning, WarningKind};
use crate::oas::ref_utils::pointer_child;
use crate::schema::{AdditionalProperties, SchemaKind, SchemaNode};
use serde_json::{Map, Number, Value};

/// Keywords that are recognised but not modelled by the compiler.
const UNSUPPORTED_KEYWORDS: &[&str] = &[
    "if",
    "then",
    "else",
    "patternProperties",
    "prefixItems",
    "dependentSchemas",
    "dependentRequired",
    "propertyNames",
    "contains",
    "unevaluatedProperties",
    "unevaluatedItems",
    "discriminator",
];

/// Converts a JSON schema fragment into a [`SchemaNode`].
///
/// # Arguments
///
/// * `value` - The raw fragment.
/// * `location` - JSON pointer of the fragment, used in warnings.
/// * `warnings` - Sink for conversion diagnostics.
pub fn schema_from_json(
    value: &Value,
    location: &str,
    warnings: &mut Vec<CompileWarning>,
) -> SchemaNode {
    match value {
        Value::Bool(true) => SchemaNode::default(),
        Value::Bool(false) => SchemaNode {
            not: Some(Box::new(SchemaNode::default())),
            ..SchemaNode::default()
        },
        Value::Object(map) => schema_from_map(map, location, warnings),
        other => {
            warnings.push(CompileWarning::new(
                WarningKind::MalformedConstraint,
                location,
                format!("expected a schema object, found {}", json_type_name(other)),
            ));
            SchemaNode::default()
        }
    }
}

fn schema_from_map(
    map: &Map<String, Value>,
    location: &str,
    warnings: &mut Vec<CompileWarning>,
) -> SchemaNode {
    let mut reader = FieldReader {
        map,
        location,
        warnings,
    };
    let mut node = SchemaNode::default();

    node.reference = reader.string("$ref");
    node.description = reader.string("description");
    node.default = map.get("default").cloned();
    node.format = reader.string("format");
    node.pattern = reader.string("pattern");
    node.nullable = reader.flag("nullable") || reader.flag("x-nullable");

    node.minimum = reader.number("minimum");
    node.maximum = reader.number("maximum");
    node.multiple_of = reader.number("multipleOf");
    node.exclusive_minimum = reader.exclusive_bound("exclusiveMinimum", &mut node.minimum);
    node.exclusive_maximum = reader.exclusive_bound("exclusiveMaximum", &mut node.maximum);

    node.min_length = reader.count("minLength");
    node.max_length = reader.count("maxLength");
    node.min_items = reader.count("minItems");
    node.max_items = reader.count("maxItems");

    node.enum_values = reader.values("enum");
    node.const_value = map.get("const").cloned();
    node.required = reader.names("required");

    if let Some(props) = map.get("properties") {
        match props {
            Value::Object(props) => {
                let base = pointer_child(location, "properties");
                for (name, prop) in props {
                    let child = schema_from_json(prop, &pointer_child(&base, name), reader.warnings);
                    node.properties.insert(name.clone(), child);
                }
            }
            other => reader.malformed("properties", other),
        }
    }

    if let Some(additional) = map.get("additionalProperties") {
        node.additional_properties = match additional {
            Value::Bool(flag) => Some(AdditionalProperties::Allowed(*flag)),
            Value::Object(_) => Some(AdditionalProperties::Schema(Box::new(schema_from_json(
                additional,
                &pointer_child(location, "additionalProperties"),
                reader.warnings,
            )))),
            other => {
                reader.malformed("additionalProperties", other);
                None
            }
        };
    }

    if let Some(items) = map.get("items") {
        match items {
            Value::Object(_) | Value::Bool(_) => {
                node.items = Some(Box::new(schema_from_json(
                    items,
                    &pointer_child(location, "items"),
                    reader.warnings,
                )));
            }
            Value::Array(_) => node.unsupported.push("items".to_string()),
            other => reader.malformed("items", other),
        }
    }

    node.all_of = reader.members("allOf");
    node.one_of = reader.members("oneOf");
    node.any_of = reader.members("anyOf");

    if let Some(not) = map.get("not") {
        node.not = Some(Box::new(schema_from_json(
            not,
            &pointer_child(location, "not"),
            reader.warnings,
        )));
    }

    for keyword in UNSUPPORTED_KEYWORDS {
        if map.contains_key(*keyword) {
            node.unsupported.push((*keyword).to_string());
        }
    }

    match map.get("type") {
        None => {}
        Some(Value::String(name)) => node.kind = SchemaKind::from_type_name(name),
        Some(Value::Array(names)) => return apply_type_list(node, names, &mut reader),
        Some(other) => reader.malformed("type", other),
    }

    node
}

/// Applies an OAS 3.1 `type` array: `null` folds into `nullable`, a single
/// remaining type is used directly, several become an `anyOf`. Unmodelled
/// keywords and `not` stay on the outer node so they are reported once.
fn apply_type_list(mut node: SchemaNode, names: &[Value], reader: &mut FieldReader<'_>) -> SchemaNode {
    let mut kinds = Vec::new();
    for name in names {
        match name.as_str() {
            Some("null") => node.nullable = true,
            Some(name) => kinds.push(SchemaKind::from_type_name(name)),
            None => reader.malformed("type", name),
        }
    }

    match kinds.len() {
        0 if node.nullable => {
            node.kind = SchemaKind::Null;
            node.nullable = false;
            node
        }
        0 => node,
        1 => {
            node.kind = kinds.remove(0);
            node
        }
        _ => {
            let nullable = node.nullable;
            let description = node.description.take();
            let default = node.default.take();
            let unsupported = std::mem::take(&mut node.unsupported);
            let not = node.not.take();
            node.nullable = false;
            let any_of = kinds
                .into_iter()
                .map(|kind| SchemaNode {
                    kind,
                    ..node.clone()
                })
                .collect();
            SchemaNode {
                any_of,
                nullable,
                description,
                default,
                unsupported,
                not,
                ..SchemaNode::default()
            }
        }
    }
}

/// Typed accessors over one schema map, reporting malformed values.
struct FieldReader<'a> {
    map: &'a Map<String, Value>,
    location: &'a str,
    warnings: &'a mut Vec<CompileWarning>,
}

impl FieldReader<'_> {
    fn malformed(&mut self, key: &str, found: &Value) {
        self.warnings.push(CompileWarning::new(
            WarningKind::MalformedConstraint,
            pointer_child(self.location, key),
            format!("ignored `{}`: unexpected {}", key, json_type_name(found)),
        ));
    }

    fn string(&mut self, key: &str) -> Option<String> {
        match self.map.get(key)? {
            Value::String(s) => Some(s.clone()),
            other => {
                self.malformed(key, other);
                None
            }
        }
    }

    fn flag(&mut self, key: &str) -> bool {
        match self.map.get(key) {
            None => false,
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                self.malformed(key, other);
                false
            }
        }
    }

    fn number(&mut self, key: &str) -> Option<Number> {
        match self.map.get(key)? {
            Value::Number(n) => Some(n.clone()),
            other => {
                self.malformed(key, other);
                None
            }
        }
    }

    fn count(&mut self, key: &str) -> Option<u64> {
        match self.map.get(key)? {
            Value::Number(n) if n.as_u64().is_some() => n.as_u64(),
            other => {
                self.malformed(key, other);
                None
            }
        }
    }

    /// OAS 3.1 uses a number; OAS 3.0 uses a boolean that turns `bound` exclusive.
    fn exclusive_bound(&mut self, key: &str, bound: &mut Option<Number>) -> Option<Number> {
        match self.map.get(key)? {
            Value::Number(n) => Some(n.clone()),
            Value::Bool(true) => bound.take(),
            Value::Bool(false) => None,
            other => {
                self.malformed(key, other);
                None
            }
        }
    }

    fn values(&mut self, key: &str) -> Option<Vec<Value>> {
        match self.map.get(key)? {
            Value::Array(items) if !items.is_empty() => Some(items.clone()),
            other => {
                self.malformed(key, other);
                None
            }
        }
    }

    fn names(&mut self, key: &str) -> Vec<String> {
        let Some(value) = self.map.get(key) else {
            return Vec::new();
        };
        let Value::Array(items) = value else {
            self.malformed(key, value);
            return Vec::new();
        };
        let mut names = Vec::with_capacity(items.len());
        for item in items {
            match item.as_str() {
                Some(name) if !names.iter().any(|n: &String| n == name) => {
                    names.push(name.to_string())
                }
                Some(_) => {}
                None => self.malformed(key, item),
            }
        }
        names
    }

    fn members(&mut self, key: &str) -> Vec<SchemaNode> {
        let Some(value) = self.map.get(key) else {
            return Vec::new();
        };
        let Value::Array(items) = value else {
            self.malformed(key, value);
            return Vec::new();
        };
        if items.is_empty() {
            self.warnings.push(CompileWarning::new(
                WarningKind::EmptyComposition,
                pointer_child(self.location, key),
                format!("`{}` has no members and was ignored", key),
            ));
        }
        let base = pointer_child(self.location, key);
        items
            .iter()
            .enumerate()
            .map(|(i, item)| schema_from_json(item, &pointer_child(&base, &i.to_string()), self.warnings))
            .collect()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
