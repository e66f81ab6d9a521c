//! # Primitives and Literals
//!
//! Scalar translation. Constraint modifiers are pushed here; their final order
//! is fixed by [`Modifier::rank`], not by the order of keywords in the input.

use crate::ir::{BaseKind, Modifier, PrimitiveKind, StringFormat, ValidationExpr};
use crate::schema::{SchemaKind, SchemaNode};

/// `const` → `literal`; one-value `enum` → `literal`; `enum` → `enumUnion`.
pub(super) fn translate_literal(node: &SchemaNode) -> Option<ValidationExpr> {
    if let Some(value) = &node.const_value {
        return Some(ValidationExpr::new(BaseKind::Literal {
            value: value.clone(),
        }));
    }
    let values = node.enum_values.as_ref()?;
    Some(match values.as_slice() {
        [value] => ValidationExpr::new(BaseKind::Literal {
            value: value.clone(),
        }),
        _ => ValidationExpr::new(BaseKind::EnumUnion {
            values: values.clone(),
        }),
    })
}

/// Translates `string`, `number`, `integer`, `boolean` and `null`.
///
/// Constraints that do not apply to the kind (e.g. `minLength` on a number)
/// are ignored.
pub(super) fn translate_primitive(node: &SchemaNode) -> ValidationExpr {
    match node.kind {
        SchemaKind::String => {
            let mut expr = ValidationExpr::primitive(PrimitiveKind::String);
            if let Some(min) = node.min_length {
                expr.push_modifier(Modifier::MinLength(min));
            }
            if let Some(max) = node.max_length {
                expr.push_modifier(Modifier::MaxLength(max));
            }
            if let Some(pattern) = &node.pattern {
                expr.push_modifier(Modifier::Regex(pattern.clone()));
            }
            if let Some(format) = node.format.as_deref().and_then(StringFormat::from_format) {
                expr.push_modifier(Modifier::Format(format));
            }
            expr
        }
        SchemaKind::Number | SchemaKind::Integer => {
            let mut expr = ValidationExpr::primitive(PrimitiveKind::Number);
            if node.kind == SchemaKind::Integer {
                expr.push_modifier(Modifier::Integer);
            }
            if let Some(min) = &node.exclusive_minimum {
                expr.push_modifier(Modifier::Gt(min.clone()));
            }
            if let Some(min) = &node.minimum {
                expr.push_modifier(Modifier::Min(min.clone()));
            }
            if let Some(max) = &node.exclusive_maximum {
                expr.push_modifier(Modifier::Lt(max.clone()));
            }
            if let Some(max) = &node.maximum {
                expr.push_modifier(Modifier::Max(max.clone()));
            }
            if let Some(step) = &node.multiple_of {
                expr.push_modifier(Modifier::MultipleOf(step.clone()));
            }
            expr
        }
        SchemaKind::Boolean => ValidationExpr::primitive(PrimitiveKind::Boolean),
        _ => ValidationExpr::primitive(PrimitiveKind::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Number};

    #[test]
    fn test_string_constraints_canonical_order() {
        let node = SchemaNode {
            kind: SchemaKind::String,
            format: Some("email".into()),
            pattern: Some(".+@.+".into()),
            max_length: Some(64),
            min_length: Some(3),
            ..SchemaNode::default()
        };
        assert_eq!(
            translate_primitive(&node).modifiers,
            vec![
                Modifier::MinLength(3),
                Modifier::MaxLength(64),
                Modifier::Regex(".+@.+".into()),
                Modifier::Format(StringFormat::Email),
            ]
        );
    }

    #[test]
    fn test_integer_bounds() {
        let node = SchemaNode {
            kind: SchemaKind::Integer,
            maximum: Some(Number::from(99)),
            exclusive_minimum: Some(Number::from(0)),
            multiple_of: Some(Number::from(3)),
            ..SchemaNode::default()
        };
        let expr = translate_primitive(&node);
        assert_eq!(
            expr.base,
            BaseKind::Primitive {
                primitive: PrimitiveKind::Number
            }
        );
        assert_eq!(
            expr.modifiers,
            vec![
                Modifier::Integer,
                Modifier::Gt(Number::from(0)),
                Modifier::Max(Number::from(99)),
                Modifier::MultipleOf(Number::from(3)),
            ]
        );
    }

    #[test]
    fn test_unknown_format_ignored() {
        let node = SchemaNode {
            kind: SchemaKind::String,
            format: Some("binary".into()),
            ..SchemaNode::default()
        };
        assert!(translate_primitive(&node).modifiers.is_empty());
    }

    #[test]
    fn test_foreign_constraints_ignored() {
        let node = SchemaNode {
            kind: SchemaKind::Boolean,
            min_length: Some(1),
            ..SchemaNode::default()
        };
        assert!(translate_primitive(&node).modifiers.is_empty());
    }

    #[test]
    fn test_enum_and_const() {
        let single = SchemaNode {
            enum_values: Some(vec![json!("a")]),
            ..SchemaNode::default()
        };
        assert_eq!(
            translate_literal(&single).unwrap().base,
            BaseKind::Literal { value: json!("a") }
        );

        let many = SchemaNode {
            kind: SchemaKind::String,
            enum_values: Some(vec![json!("b"), json!("a")]),
            ..SchemaNode::default()
        };
        assert_eq!(
            translate_literal(&many).unwrap().base,
            BaseKind::EnumUnion {
                values: vec![json!("b"), json!("a")]
            }
        );

        let constant = SchemaNode {
            const_value: Some(json!(7)),
            ..SchemaNode::default()
        };
        assert_eq!(
            translate_literal(&constant).unwrap().base,
            BaseKind::Literal { value: json!(7) }
        );
        assert!(translate_literal(&SchemaNode::default()).is_none());
    }
}
