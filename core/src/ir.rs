#![deny(missing_docs)]

//! # Validation Expression IR
//!
//! The compiler's output unit. A [`ValidationExpr`] is a closed tagged variant
//! ([`BaseKind`]) plus an ordered list of [`Modifier`]s.
//!
//! Modifiers are always kept in canonical order (see [`Modifier::rank`]), no
//! matter in which order the translator pushes them. Identical input therefore
//! yields identical IR, and identical rendered text.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Number, Value};

/// Primitive base types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PrimitiveKind {
    /// Any string.
    String,
    /// Any number. Integers carry an additional [`Modifier::Integer`].
    Number,
    /// `true` / `false`.
    Boolean,
    /// The `null` value.
    Null,
    /// No payload (a response without content).
    Void,
}

/// String formats with a dedicated validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StringFormat {
    /// `email`
    Email,
    /// `uri` / `url`
    Url,
    /// `uuid`
    Uuid,
    /// `date-time`
    DateTime,
    /// `date`
    Date,
    /// `time`
    Time,
    /// `ipv4`
    Ipv4,
    /// `ipv6`
    Ipv6,
}

impl StringFormat {
    /// Maps a JSON Schema `format` value. Formats without a validator return `None`.
    pub fn from_format(format: &str) -> Option<Self> {
        match format {
            "email" => Some(StringFormat::Email),
            "uri" | "url" => Some(StringFormat::Url),
            "uuid" => Some(StringFormat::Uuid),
            "date-time" => Some(StringFormat::DateTime),
            "date" => Some(StringFormat::Date),
            "time" => Some(StringFormat::Time),
            "ipv4" => Some(StringFormat::Ipv4),
            "ipv6" => Some(StringFormat::Ipv6),
            _ => None,
        }
    }
}

/// A chained refinement applied on top of a base kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "modifier", content = "value", rename_all = "camelCase")]
pub enum Modifier {
    /// Number must be an integer.
    Integer,
    /// Exclusive lower bound.
    Gt(Number),
    /// Inclusive lower bound.
    Min(Number),
    /// Exclusive upper bound.
    Lt(Number),
    /// Inclusive upper bound.
    Max(Number),
    /// Number must be a multiple of the value.
    MultipleOf(Number),
    /// Minimum string length.
    MinLength(u64),
    /// Minimum array length.
    MinItems(u64),
    /// Maximum string length.
    MaxLength(u64),
    /// Maximum array length.
    MaxItems(u64),
    /// String must match the regex source.
    Regex(String),
    /// String must match a well-known format.
    Format(StringFormat),
    /// Every object property is optional.
    Partial,
    /// Unknown object keys are kept.
    Passthrough,
    /// Unknown object keys are rejected.
    Strict,
    /// Human readable description.
    Describe(String),
    /// Value used when the input is absent.
    Default(Value),
    /// The value may be absent.
    Optional,
    /// The value may be `null`.
    Nullable,
}

impl Modifier {
    /// Canonical position of the modifier. Bounds come before pattern and
    /// format, shape modifiers after constraints, `optional` and `nullable` last.
    pub fn rank(&self) -> u8 {
        match self {
            Modifier::Integer => 0,
            Modifier::Gt(_) | Modifier::Min(_) => 1,
            Modifier::Lt(_) | Modifier::Max(_) => 2,
            Modifier::MultipleOf(_) => 3,
            Modifier::MinLength(_) | Modifier::MinItems(_) => 4,
            Modifier::MaxLength(_) | Modifier::MaxItems(_) => 5,
            Modifier::Regex(_) => 6,
            Modifier::Format(_) => 7,
            Modifier::Partial => 8,
            Modifier::Passthrough | Modifier::Strict => 9,
            Modifier::Describe(_) => 10,
            Modifier::Default(_) => 11,
            Modifier::Optional => 12,
            Modifier::Nullable => 13,
        }
    }
}

/// One declared object property.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectProperty {
    /// Property type. Carries an `optional` modifier only when the parent object
    /// is not `partial`.
    pub expr: ValidationExpr,
    /// Whether the property may be absent (per-property or via `partial`).
    pub is_optional: bool,
}

/// The closed set of expression shapes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BaseKind {
    /// A primitive type.
    Primitive {
        /// Which primitive.
        primitive: PrimitiveKind,
    },
    /// An object shape.
    #[serde(rename_all = "camelCase")]
    Object {
        /// Declared properties in document order.
        properties: IndexMap<String, ObjectProperty>,
        /// Type of undeclared properties, from a schema-valued `additionalProperties`.
        #[serde(skip_serializing_if = "Option::is_none")]
        index_signature: Option<Box<ValidationExpr>>,
    },
    /// A homogeneous array.
    Array {
        /// Item type.
        items: Box<ValidationExpr>,
    },
    /// Any of the members.
    Union {
        /// Members in document order.
        members: Vec<ValidationExpr>,
    },
    /// All of the members.
    Intersection {
        /// Members in document order.
        members: Vec<ValidationExpr>,
    },
    /// Exactly one value.
    Literal {
        /// The value.
        value: Value,
    },
    /// One of a fixed list of values.
    EnumUnion {
        /// Values in document order.
        values: Vec<Value>,
    },
    /// A named declaration resolved at use time (breaks reference cycles).
    LazyRef {
        /// Declaration name.
        name: String,
    },
    /// A named declaration that is declared before its use.
    NamedRef {
        /// Declaration name.
        name: String,
    },
    /// Anything. `note` says why a more precise type was not produced.
    Unknown {
        /// Reason for the fallback, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },
}

/// A base kind plus its canonical modifier chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationExpr {
    /// Shape.
    #[serde(flatten)]
    pub base: BaseKind,
    /// Refinements in canonical order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Modifier>,
}

/// How a declaration is referenced from an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    /// Must be declared before the referencing declaration.
    Named,
    /// Resolved at use time; imposes no ordering.
    Lazy,
}

impl ValidationExpr {
    /// An expression without modifiers.
    pub fn new(base: BaseKind) -> Self {
        Self {
            base,
            modifiers: Vec::new(),
        }
    }

    /// A primitive expression.
    pub fn primitive(primitive: PrimitiveKind) -> Self {
        Self::new(BaseKind::Primitive { primitive })
    }

    /// An `unknown` expression with an optional note.
    pub fn unknown(note: Option<String>) -> Self {
        Self::new(BaseKind::Unknown { note })
    }

    /// A reference to a declaration.
    pub fn named_ref(name: impl Into<String>) -> Self {
        Self::new(BaseKind::NamedRef { name: name.into() })
    }

    /// A lazy reference to a declaration.
    pub fn lazy_ref(name: impl Into<String>) -> Self {
        Self::new(BaseKind::LazyRef { name: name.into() })
    }

    /// Inserts a modifier at its canonical position.
    ///
    /// Modifiers of equal rank keep insertion order. `optional`, `nullable`,
    /// `partial`, `passthrough`, `strict` and `integer` are never duplicated.
    pub fn push_modifier(&mut self, modifier: Modifier) {
        let singleton = matches!(
            modifier,
            Modifier::Optional
                | Modifier::Nullable
                | Modifier::Partial
                | Modifier::Passthrough
                | Modifier::Strict
                | Modifier::Integer
        );
        if singleton && self.modifiers.contains(&modifier) {
            return;
        }
        let rank = modifier.rank();
        let at = self
            .modifiers
            .iter()
            .position(|m| m.rank() > rank)
            .unwrap_or(self.modifiers.len());
        self.modifiers.insert(at, modifier);
    }

    /// Builder form of [`ValidationExpr::push_modifier`].
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.push_modifier(modifier);
        self
    }

    /// Whether the modifier list contains `modifier`.
    pub fn has_modifier(&self, modifier: &Modifier) -> bool {
        self.modifiers.contains(modifier)
    }

    /// Whether the expression carries an `optional` modifier.
    pub fn is_optional(&self) -> bool {
        self.has_modifier(&Modifier::Optional)
    }

    /// Direct child expressions, in structural order.
    pub fn children(&self) -> Vec<&ValidationExpr> {
        match &self.base {
            BaseKind::Object {
                properties,
                index_signature,
            } => properties
                .values()
                .map(|p| &p.expr)
                .chain(index_signature.as_deref())
                .collect(),
            BaseKind::Array { items } => vec![items.as_ref()],
            BaseKind::Union { members } | BaseKind::Intersection { members } => {
                members.iter().collect()
            }
            _ => Vec::new(),
        }
    }

    /// Visits every declaration reference in the tree, depth first.
    pub fn visit_refs<F: FnMut(&str, RefKind)>(&self, visit: &mut F) {
        match &self.base {
            BaseKind::NamedRef { name } => visit(name, RefKind::Named),
            BaseKind::LazyRef { name } => visit(name, RefKind::Lazy),
            _ => {
                for child in self.children() {
                    child.visit_refs(visit);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_modifiers_sorted_regardless_of_push_order() {
        let mut a = ValidationExpr::primitive(PrimitiveKind::String);
        a.push_modifier(Modifier::Nullable);
        a.push_modifier(Modifier::Regex("^x".into()));
        a.push_modifier(Modifier::MinLength(2));

        let mut b = ValidationExpr::primitive(PrimitiveKind::String);
        b.push_modifier(Modifier::MinLength(2));
        b.push_modifier(Modifier::Regex("^x".into()));
        b.push_modifier(Modifier::Nullable);

        assert_eq!(a, b);
        assert_eq!(
            a.modifiers,
            vec![
                Modifier::MinLength(2),
                Modifier::Regex("^x".into()),
                Modifier::Nullable
            ]
        );
    }

    #[test]
    fn test_nullable_stays_last() {
        let expr = ValidationExpr::primitive(PrimitiveKind::Number)
            .with_modifier(Modifier::Nullable)
            .with_modifier(Modifier::Optional)
            .with_modifier(Modifier::Default(json!(3)));
        assert_eq!(expr.modifiers.last(), Some(&Modifier::Nullable));
    }

    #[test]
    fn test_singleton_modifiers_not_duplicated() {
        let expr = ValidationExpr::primitive(PrimitiveKind::Boolean)
            .with_modifier(Modifier::Optional)
            .with_modifier(Modifier::Optional);
        assert_eq!(expr.modifiers, vec![Modifier::Optional]);
    }

    #[test]
    fn test_visit_refs() {
        let mut properties = IndexMap::new();
        properties.insert(
            "a".to_string(),
            ObjectProperty {
                expr: ValidationExpr::named_ref("A"),
                is_optional: false,
            },
        );
        properties.insert(
            "b".to_string(),
            ObjectProperty {
                expr: ValidationExpr::new(BaseKind::Array {
                    items: Box::new(ValidationExpr::lazy_ref("B")),
                }),
                is_optional: false,
            },
        );
        let expr = ValidationExpr::new(BaseKind::Object {
            properties,
            index_signature: Some(Box::new(ValidationExpr::named_ref("C"))),
        });

        let mut seen = Vec::new();
        expr.visit_refs(&mut |name, kind| seen.push((name.to_string(), kind)));
        assert_eq!(
            seen,
            vec![
                ("A".to_string(), RefKind::Named),
                ("B".to_string(), RefKind::Lazy),
                ("C".to_string(), RefKind::Named),
            ]
        );
    }

    #[test]
    fn test_serialized_shape() {
        let expr = ValidationExpr::primitive(PrimitiveKind::String).with_modifier(Modifier::MinLength(5));
        assert_eq!(
            serde_json::to_value(&expr).unwrap(),
            json!({
                "kind": "primitive",
                "primitive": "string",
                "modifiers": [{"modifier": "minLength", "value": 5}]
            })
        );
    }
}
