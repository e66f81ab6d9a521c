#![deny(missing_docs)]

//! # Type Translator
//!
//! Converts [`SchemaNode`]s into [`ValidationExpr`]s.
//!
//! Rules, in priority order:
//! 1. `$ref` → `namedRef`, or `lazyRef` when the target is currently being
//!    translated (a cycle). Targets are translated once and cached.
//! 2. `allOf` → merged object shape, intersected with non-object members.
//! 3. `oneOf` / `anyOf` → `union` of the members in document order.
//! 4. `not` → `unknown` with a note and an `UnsupportedKeyword` warning. Next
//!    to a combinator the combinator wins and `not` is only reported.
//! 5. `const` / `enum` → `literal` / `enumUnion`.
//! 6. By `type`: object, array, primitives; unknown types fall back to `unknown`.
//!
//! Trailing modifiers (`describe`, `default`, `optional`, `nullable`) are added
//! after the rule ran; [`Modifier::rank`] keeps `nullable` outermost.
//!
//! A [`Translator`] lives for one compilation. Its resolution stack is the only
//! mutable state touched by recursion; its cache holds finished declarations.

mod objects;
mod primitives;

use crate::config::CompilerOptions;
use crate::error::{CompileError, CompileResult, CompileWarning, WarningKind};
use crate::ir::{BaseKind, Modifier, ValidationExpr};
use crate::oas::ref_utils::{pointer_child, schema_pointer};
use crate::registry::SchemaRegistry;
use crate::schema::{SchemaKind, SchemaNode};
use indexmap::IndexMap;

/// Per-call translation state supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateContext {
    /// Add an `optional` modifier to the result.
    pub optional: bool,
    /// JSON pointer of the node, used in warnings.
    pub location: String,
}

impl TranslateContext {
    /// Context for a fragment at `location`.
    pub fn at(location: impl Into<String>) -> Self {
        Self {
            optional: false,
            location: location.into(),
        }
    }

    /// Context for a child fragment; optionality is not inherited.
    pub fn child(&self, segment: &str) -> Self {
        Self::at(pointer_child(&self.location, segment))
    }

    /// Sets the optionality flag.
    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }
}

/// Translates schema nodes against one registry.
pub struct Translator<'a> {
    registry: &'a SchemaRegistry,
    options: &'a CompilerOptions,
    stack: Vec<String>,
    cache: IndexMap<String, ValidationExpr>,
    warnings: Vec<CompileWarning>,
}

impl<'a> Translator<'a> {
    /// Creates a translator with an empty cache.
    pub fn new(registry: &'a SchemaRegistry, options: &'a CompilerOptions) -> Self {
        Self {
            registry,
            options,
            stack: Vec::new(),
            cache: IndexMap::new(),
            warnings: Vec::new(),
        }
    }

    /// Translates the registered schema `name` unless it is already cached.
    pub fn translate_named(&mut self, name: &str) -> CompileResult<()> {
        if self.cache.contains_key(name) {
            return Ok(());
        }
        let registry = self.registry;
        let node = registry
            .get(name)
            .ok_or_else(|| CompileError::UnresolvedReference {
                reference: schema_pointer(name),
            })?;

        tracing::debug!(declaration = name, depth = self.stack.len(), "translating");
        self.stack.push(name.to_string());
        let result = self.translate(node, &TranslateContext::at(schema_pointer(name)));
        self.stack.pop();

        self.cache.insert(name.to_string(), result?);
        Ok(())
    }

    /// Translates one node.
    pub fn translate(
        &mut self,
        node: &SchemaNode,
        ctx: &TranslateContext,
    ) -> CompileResult<ValidationExpr> {
        let mut expr = self.translate_shape(node, ctx)?;

        for keyword in &node.unsupported {
            self.warn(
                WarningKind::UnsupportedKeyword,
                &ctx.location,
                format!("`{}` is not supported and was ignored", keyword),
            );
        }

        if self.options.with_description {
            if let Some(description) = &node.description {
                expr.push_modifier(Modifier::Describe(description.clone()));
            }
        }
        if self.options.with_default_values {
            if let Some(default) = &node.default {
                expr.push_modifier(Modifier::Default(default.clone()));
            }
        }
        if ctx.optional {
            expr.push_modifier(Modifier::Optional);
        }
        if node.nullable {
            expr.push_modifier(Modifier::Nullable);
        }
        Ok(expr)
    }

    /// Consumes the translator, returning the cached declarations and warnings.
    pub fn into_parts(self) -> (IndexMap<String, ValidationExpr>, Vec<CompileWarning>) {
        (self.cache, self.warnings)
    }

    fn translate_shape(
        &mut self,
        node: &SchemaNode,
        ctx: &TranslateContext,
    ) -> CompileResult<ValidationExpr> {
        if let Some(reference) = &node.reference {
            return self.translate_ref(reference);
        }
        let composed = !node.all_of.is_empty() || !node.one_of.is_empty() || !node.any_of.is_empty();
        if node.not.is_some() {
            let message = if composed {
                "`not` cannot be expressed precisely and was ignored"
            } else {
                "`not` cannot be expressed precisely; falling back to unknown"
            };
            self.warn(WarningKind::UnsupportedKeyword, &ctx.location, message);
            if !composed {
                return Ok(ValidationExpr::unknown(Some(
                    "negation (`not`) is not supported".to_string(),
                )));
            }
        }
        if !node.all_of.is_empty() {
            return self.translate_all_of(node, ctx);
        }
        if !node.one_of.is_empty() || !node.any_of.is_empty() {
            return self.translate_union(node, ctx);
        }
        if let Some(expr) = primitives::translate_literal(node) {
            return Ok(expr);
        }

        match &node.kind {
            SchemaKind::Object => self.translate_object(node, ctx),
            SchemaKind::Array => self.translate_array(node, ctx),
            SchemaKind::String
            | SchemaKind::Number
            | SchemaKind::Integer
            | SchemaKind::Boolean
            | SchemaKind::Null => Ok(primitives::translate_primitive(node)),
            SchemaKind::Other(name) => {
                self.warn(
                    WarningKind::UnsupportedType,
                    &ctx.location,
                    format!("unsupported type `{}`; falling back to unknown", name),
                );
                Ok(ValidationExpr::unknown(Some(format!(
                    "unsupported type `{}`",
                    name
                ))))
            }
            SchemaKind::Unspecified if node.has_object_shape() => self.translate_object(node, ctx),
            SchemaKind::Unspecified if node.items.is_some() => self.translate_array(node, ctx),
            SchemaKind::Unspecified => Ok(ValidationExpr::unknown(None)),
        }
    }

    fn translate_ref(&mut self, reference: &str) -> CompileResult<ValidationExpr> {
        let registry = self.registry;
        let name = registry.resolve(reference)?;
        if self.stack.iter().any(|active| active == name) {
            tracing::debug!(declaration = name, "cycle detected; using lazy reference");
            return Ok(ValidationExpr::lazy_ref(name));
        }
        self.translate_named(name)?;
        Ok(ValidationExpr::named_ref(name))
    }

    fn translate_union(
        &mut self,
        node: &SchemaNode,
        ctx: &TranslateContext,
    ) -> CompileResult<ValidationExpr> {
        let one_of = self.translate_members(&node.one_of, &ctx.child("oneOf"))?;
        let any_of = self.translate_members(&node.any_of, &ctx.child("anyOf"))?;

        let union = |members: Vec<ValidationExpr>| ValidationExpr::new(BaseKind::Union { members });
        Ok(match (one_of.is_empty(), any_of.is_empty()) {
            (false, true) => union(one_of),
            (true, false) => union(any_of),
            _ => ValidationExpr::new(BaseKind::Intersection {
                members: vec![union(one_of), union(any_of)],
            }),
        })
    }

    fn translate_members(
        &mut self,
        members: &[SchemaNode],
        ctx: &TranslateContext,
    ) -> CompileResult<Vec<ValidationExpr>> {
        members
            .iter()
            .enumerate()
            .map(|(i, member)| self.translate(member, &ctx.child(&i.to_string())))
            .collect()
    }

    fn translate_array(
        &mut self,
        node: &SchemaNode,
        ctx: &TranslateContext,
    ) -> CompileResult<ValidationExpr> {
        let items = match &node.items {
            Some(items) => self.translate(items, &ctx.child("items"))?,
            None => ValidationExpr::unknown(None),
        };
        let mut expr = ValidationExpr::new(BaseKind::Array {
            items: Box::new(items),
        });
        if let Some(min) = node.min_items {
            expr.push_modifier(Modifier::MinItems(min));
        }
        if let Some(max) = node.max_items {
            expr.push_modifier(Modifier::MaxItems(max));
        }
        Ok(expr)
    }

    pub(crate) fn warn(&mut self, kind: WarningKind, location: &str, message: impl Into<String>) {
        let warning = CompileWarning::new(kind, location, message);
        tracing::warn!(location = %warning.location, "{}", warning.message);
        self.warnings.push(warning);
    }
}

