#![deny(missing_docs)]

//! # Compiler
//!
//! Runs one compilation: register the named schemas, translate each of them,
//! order the declarations, then bind every operation to an endpoint descriptor.
//!
//! All state (registry, resolution stack, translation cache) is created here
//! and dropped when the call returns, so repeated compilations are isolated.

use crate::config::CompilerOptions;
use crate::endpoints::{EndpointBinder, EndpointDescriptor};
use crate::error::{CompileResult, CompileWarning};
use crate::graph::DependencyGraph;
use crate::ir::ValidationExpr;
use crate::oas::document::{load_document_yaml, ApiDocument};
use crate::registry::SchemaRegistry;
use crate::translate::Translator;
use indexmap::IndexMap;
use serde::Serialize;

/// A named declaration in emission order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Declaration {
    /// Schema name.
    pub name: String,
    /// Translated expression.
    pub expr: ValidationExpr,
}

/// Result of a successful compilation, handed to an [`Emitter`](crate::emit::Emitter).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledDocument {
    /// Declarations; each follows the declarations it references by name.
    pub declarations: Vec<Declaration>,
    /// Endpoint descriptors in document traversal order.
    pub endpoints: Vec<EndpointDescriptor>,
    /// Loader warnings first, then translation and binding warnings.
    pub warnings: Vec<CompileWarning>,
}

impl CompiledDocument {
    /// Looks up a declaration by name.
    pub fn declaration(&self, name: &str) -> Option<&ValidationExpr> {
        self.declarations
            .iter()
            .find(|d| d.name == name)
            .map(|d| &d.expr)
    }
}

/// Compiles a loaded document.
///
/// # Errors
///
/// * `DuplicateDeclaration` if two schemas share a name.
/// * `UnresolvedReference` if a `$ref` names no registered schema.
/// * `InternalCycle` if the declarations cannot be ordered.
pub fn compile(document: &ApiDocument, options: &CompilerOptions) -> CompileResult<CompiledDocument> {
    let span = tracing::info_span!(
        "compile",
        schemas = document.schemas.len(),
        operations = document.operations.len()
    );
    let _guard = span.enter();

    let mut registry = SchemaRegistry::with_self_uri(document.self_uri.clone());
    for schema in &document.schemas {
        registry.register(schema.name.clone(), schema.node.clone())?;
    }

    let mut translator = Translator::new(&registry, options);
    for name in registry.names() {
        translator.translate_named(name)?;
    }

    let binder = EndpointBinder::new(options)?;
    let mut endpoints = Vec::with_capacity(document.operations.len());
    for operation in &document.operations {
        endpoints.push(binder.bind(&mut translator, operation)?);
    }

    let (translated, translator_warnings) = translator.into_parts();

    // Registry order is the tie-break, not the order in which the cache filled.
    let by_registry: IndexMap<String, ValidationExpr> = registry
        .names()
        .filter_map(|name| {
            translated
                .get(name)
                .map(|expr| (name.to_string(), expr.clone()))
        })
        .collect();

    let graph = DependencyGraph::build(&by_registry);
    let declarations = graph
        .order()?
        .into_iter()
        .filter_map(|name| {
            by_registry.get(name).map(|expr| Declaration {
                name: name.to_string(),
                expr: expr.clone(),
            })
        })
        .collect::<Vec<_>>();

    let mut warnings = document.warnings.clone();
    warnings.extend(translator_warnings);

    tracing::info!(
        declarations = declarations.len(),
        endpoints = endpoints.len(),
        warnings = warnings.len(),
        "compilation finished"
    );

    Ok(CompiledDocument {
        declarations,
        endpoints,
        warnings,
    })
}

/// Loads a YAML (or JSON) document and compiles it.
pub fn compile_yaml(content: &str, options: &CompilerOptions) -> CompileResult<CompiledDocument> {
    let document = load_document_yaml(content)?;
    compile(&document, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompileError;
    use crate::oas::document::NamedSchema;
    use crate::schema::{SchemaKind, SchemaNode};

    fn named(name: &str, node: SchemaNode) -> NamedSchema {
        NamedSchema {
            name: name.to_string(),
            node,
        }
    }

    fn reference(name: &str) -> SchemaNode {
        SchemaNode {
            reference: Some(format!("#/components/schemas/{}", name)),
            ..SchemaNode::default()
        }
    }

    #[test]
    fn test_duplicate_declaration() {
        let document = ApiDocument {
            schemas: vec![
                named("Pet", SchemaNode::of_kind(SchemaKind::String)),
                named("Pet", SchemaNode::of_kind(SchemaKind::Number)),
            ],
            ..ApiDocument::default()
        };
        let err = compile(&document, &CompilerOptions::default()).unwrap_err();
        assert!(matches!(err, CompileError::DuplicateDeclaration { name } if name == "Pet"));
    }

    #[test]
    fn test_unresolved_reference_is_fatal() {
        let document = ApiDocument {
            schemas: vec![named("Owner", reference("Missing"))],
            ..ApiDocument::default()
        };
        let err = compile(&document, &CompilerOptions::default()).unwrap_err();
        assert!(matches!(err, CompileError::UnresolvedReference { .. }));
    }

    #[test]
    fn test_declarations_follow_dependencies() {
        let document = ApiDocument {
            schemas: vec![
                named("Order", reference("Customer")),
                named("Customer", SchemaNode::of_kind(SchemaKind::String)),
                named("Note", SchemaNode::of_kind(SchemaKind::Boolean)),
            ],
            ..ApiDocument::default()
        };
        let compiled = compile(&document, &CompilerOptions::default()).unwrap();
        let names: Vec<_> = compiled.declarations.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Customer", "Order", "Note"]);
        assert_eq!(
            compiled.declaration("Order"),
            Some(&ValidationExpr::named_ref("Customer"))
        );
    }
}
