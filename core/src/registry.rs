#![deny(missing_docs)]

//! # Schema Registry
//!
//! Stores every named schema of a document and resolves `$ref` pointers to the
//! canonical declared name.
//!
//! Registration happens before translation starts; afterwards the registry is
//! only read. Resolution consults a ref index filled at registration time (the
//! canonical `#/components/schemas/{name}` pointer of every schema) and falls
//! back to pointer decoding for equivalent spellings (percent-encoding, `$self`
//! absolute URIs).

use crate::error::{CompileError, CompileResult};
use crate::oas::ref_utils::{extract_component_name, schema_pointer};
use crate::schema::SchemaNode;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Named schemas of one document.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: IndexMap<String, SchemaNode>,
    refs: HashMap<String, String>,
    self_uri: Option<String>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry for a document identified by `$self`.
    pub fn with_self_uri(self_uri: Option<String>) -> Self {
        Self {
            self_uri,
            ..Self::default()
        }
    }

    /// Stores a named schema.
    ///
    /// # Errors
    ///
    /// `DuplicateDeclaration` if `name` is already registered.
    pub fn register(&mut self, name: impl Into<String>, node: SchemaNode) -> CompileResult<()> {
        let name = name.into();
        if self.schemas.contains_key(&name) {
            return Err(CompileError::DuplicateDeclaration { name });
        }
        self.refs.insert(schema_pointer(&name), name.clone());
        self.schemas.insert(name, node);
        Ok(())
    }

    /// Resolves a `$ref` string to the declared schema name.
    ///
    /// # Errors
    ///
    /// `UnresolvedReference` if the pointer does not name a registered schema.
    pub fn resolve(&self, reference: &str) -> CompileResult<&str> {
        if let Some(name) = self.refs.get(reference) {
            return Ok(name.as_str());
        }

        extract_component_name(reference, self.self_uri.as_deref(), "schemas")
            .and_then(|name| self.schemas.get_key_value(&name))
            .map(|(name, _)| name.as_str())
            .ok_or_else(|| CompileError::UnresolvedReference {
                reference: reference.to_string(),
            })
    }

    /// Returns the schema registered under `name`.
    pub fn get(&self, name: &str) -> Option<&SchemaNode> {
        self.schemas.get(name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaKind;

    fn registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::with_self_uri(Some("https://example.com/api.yaml".into()));
        registry
            .register("User", SchemaNode::of_kind(SchemaKind::Object))
            .unwrap();
        registry
            .register("User Profile", SchemaNode::of_kind(SchemaKind::Object))
            .unwrap();
        registry
    }

    #[test]
    fn test_resolve_canonical_pointer() {
        assert_eq!(registry().resolve("#/components/schemas/User").unwrap(), "User");
    }

    #[test]
    fn test_resolve_percent_encoded() {
        assert_eq!(
            registry()
                .resolve("#/components/schemas/User%20Profile")
                .unwrap(),
            "User Profile"
        );
    }

    #[test]
    fn test_resolve_self_absolute() {
        assert_eq!(
            registry()
                .resolve("https://example.com/api.yaml#/components/schemas/User")
                .unwrap(),
            "User"
        );
    }

    #[test]
    fn test_unresolved_reference() {
        let err = registry().resolve("#/components/schemas/Missing").unwrap_err();
        assert!(matches!(
            err,
            CompileError::UnresolvedReference { reference } if reference == "#/components/schemas/Missing"
        ));
    }

    #[test]
    fn test_external_reference_is_unresolved() {
        let err = registry().resolve("other.yaml#/components/schemas/User").unwrap_err();
        assert!(matches!(err, CompileError::UnresolvedReference { .. }));
    }

    #[test]
    fn test_duplicate_declaration() {
        let mut registry = registry();
        let err = registry
            .register("User", SchemaNode::default())
            .unwrap_err();
        assert!(matches!(err, CompileError::DuplicateDeclaration { name } if name == "User"));
    }

    #[test]
    fn test_names_in_registration_order() {
        let names: Vec<_> = registry().names().map(str::to_string).collect();
        assert_eq!(names, vec!["User", "User Profile"]);
    }
}
