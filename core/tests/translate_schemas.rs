use openapi_zod_core::schema::schema_from_json;
use openapi_zod_core::{
    BaseKind, CompilerOptions, Modifier, PrimitiveKind, SchemaRegistry, StringFormat,
    TranslateContext, Translator, ValidationExpr,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Number, Value};

fn translate_with(options: &CompilerOptions, schema: Value) -> ValidationExpr {
    let mut warnings = Vec::new();
    let node = schema_from_json(&schema, "#/inline", &mut warnings);
    assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
    let registry = SchemaRegistry::new();
    let mut translator = Translator::new(&registry, options);
    translator
        .translate(&node, &TranslateContext::at("#/inline"))
        .unwrap()
}

fn translate(schema: Value) -> ValidationExpr {
    translate_with(&CompilerOptions::default(), schema)
}

#[test]
fn test_type_array_with_null() {
    let expr = translate(json!({"type": ["string", "null"], "format": "email"}));
    assert_eq!(
        expr,
        ValidationExpr::primitive(PrimitiveKind::String)
            .with_modifier(Modifier::Format(StringFormat::Email))
            .with_modifier(Modifier::Nullable)
    );
}

#[test]
fn test_multi_type_becomes_union() {
    let expr = translate(json!({"type": ["string", "integer"]}));
    assert_eq!(
        expr,
        ValidationExpr::new(BaseKind::Union {
            members: vec![
                ValidationExpr::primitive(PrimitiveKind::String),
                ValidationExpr::primitive(PrimitiveKind::Number).with_modifier(Modifier::Integer),
            ]
        })
    );
}

#[test]
fn test_boolean_exclusive_bounds() {
    let expr = translate(json!({
        "type": "number",
        "minimum": 0,
        "exclusiveMinimum": true,
        "maximum": 1
    }));
    assert_eq!(
        expr.modifiers,
        vec![
            Modifier::Gt(Number::from(0)),
            Modifier::Max(Number::from(1)),
        ]
    );
}

#[test]
fn test_additional_properties_variants() {
    let map = translate(json!({
        "type": "object",
        "additionalProperties": {"type": "integer"}
    }));
    assert_eq!(
        map.base,
        BaseKind::Object {
            properties: Default::default(),
            index_signature: Some(Box::new(
                ValidationExpr::primitive(PrimitiveKind::Number).with_modifier(Modifier::Integer)
            )),
        }
    );
    assert!(map.modifiers.is_empty());

    let closed = translate(json!({"type": "object", "additionalProperties": false}));
    assert_eq!(closed.modifiers, vec![Modifier::Strict]);

    let strict = CompilerOptions {
        strict_objects: true,
        ..CompilerOptions::default()
    };
    let implicit = translate_with(&strict, json!({"type": "object"}));
    assert_eq!(implicit.modifiers, vec![Modifier::Strict]);
}

#[test]
fn test_one_of_and_any_of_together() {
    let expr = translate(json!({
        "oneOf": [{"type": "string"}, {"type": "number"}],
        "anyOf": [{"type": "boolean"}]
    }));
    let BaseKind::Intersection { members } = expr.base else {
        panic!("expected an intersection");
    };
    assert_eq!(members.len(), 2);
    assert!(matches!(&members[0].base, BaseKind::Union { members } if members.len() == 2));
    assert!(matches!(&members[1].base, BaseKind::Union { members } if members.len() == 1));
}

#[test]
fn test_typed_enum_is_literal_set() {
    let expr = translate(json!({"type": "string", "enum": ["asc", "desc"], "nullable": true}));
    assert_eq!(
        expr,
        ValidationExpr::new(BaseKind::EnumUnion {
            values: vec![json!("asc"), json!("desc")]
        })
        .with_modifier(Modifier::Nullable)
    );
}

#[test]
fn test_array_bounds() {
    let expr = translate(json!({
        "type": "array",
        "items": {"type": "string"},
        "minItems": 1,
        "maxItems": 3
    }));
    assert_eq!(
        expr.modifiers,
        vec![Modifier::MinItems(1), Modifier::MaxItems(3)]
    );
}

#[test]
fn test_defaults_respect_options() {
    let schema = json!({"type": "integer", "default": 5, "description": "page size"});
    assert_eq!(
        translate(schema.clone()).modifiers,
        vec![Modifier::Integer, Modifier::Default(json!(5))]
    );

    let options = CompilerOptions {
        with_default_values: false,
        with_description: true,
        ..CompilerOptions::default()
    };
    assert_eq!(
        translate_with(&options, schema).modifiers,
        vec![
            Modifier::Integer,
            Modifier::Describe("page size".to_string())
        ]
    );
}

#[test]
fn test_named_translation_is_cached() {
    let mut registry = SchemaRegistry::new();
    let mut warnings = Vec::new();
    registry
        .register(
            "Id",
            schema_from_json(&json!({"type": "string", "format": "uuid"}), "#/Id", &mut warnings),
        )
        .unwrap();
    let options = CompilerOptions::default();
    let mut translator = Translator::new(&registry, &options);

    let reference = schema_from_json(
        &json!({"$ref": "#/components/schemas/Id"}),
        "#/inline",
        &mut warnings,
    );
    for _ in 0..2 {
        let expr = translator
            .translate(&reference, &TranslateContext::at("#/inline"))
            .unwrap();
        assert_eq!(expr, ValidationExpr::named_ref("Id"));
    }

    let (declarations, warnings) = translator.into_parts();
    assert_eq!(declarations.len(), 1);
    assert!(warnings.is_empty());
    assert_eq!(
        declarations["Id"],
        ValidationExpr::primitive(PrimitiveKind::String)
            .with_modifier(Modifier::Format(StringFormat::Uuid))
    );
}
