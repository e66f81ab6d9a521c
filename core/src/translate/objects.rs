//! # Object Shapes
//!
//! Object translation and `allOf` flattening.

use super::{TranslateContext, Translator};
use crate::error::{CompileResult, WarningKind};
use crate::ir::{BaseKind, Modifier, ObjectProperty, ValidationExpr};
use crate::schema::{AdditionalProperties, SchemaKind, SchemaNode};
use indexmap::IndexMap;

impl Translator<'_> {
    /// Translates an object shape.
    ///
    /// - no `required` and at least one property: a single `partial` modifier,
    ///   no per-property `optional`
    /// - otherwise: `optional` on every property missing from `required`
    /// - `additionalProperties: false` → `strict`; schema → index signature;
    ///   `true` → `passthrough`; absent → `passthrough` (or `strict` with
    ///   `strictObjects`)
    pub(super) fn translate_object(
        &mut self,
        node: &SchemaNode,
        ctx: &TranslateContext,
    ) -> CompileResult<ValidationExpr> {
        let partial = node.required.is_empty() && !node.properties.is_empty();
        let properties_ctx = ctx.child("properties");

        let mut properties = IndexMap::with_capacity(node.properties.len());
        for (name, property) in &node.properties {
            let is_required = node.required.contains(name);
            let prop_ctx = properties_ctx
                .child(name)
                .with_optional(!partial && !is_required);
            let expr = self.translate(property, &prop_ctx)?;
            properties.insert(
                name.clone(),
                ObjectProperty {
                    expr,
                    is_optional: !is_required,
                },
            );
        }

        let index_signature = match &node.additional_properties {
            Some(AdditionalProperties::Schema(schema)) => Some(Box::new(
                self.translate(schema, &ctx.child("additionalProperties"))?,
            )),
            _ => None,
        };

        let mut expr = ValidationExpr::new(BaseKind::Object {
            properties,
            index_signature,
        });
        if partial {
            expr.push_modifier(Modifier::Partial);
        }
        match &node.additional_properties {
            Some(AdditionalProperties::Allowed(false)) => expr.push_modifier(Modifier::Strict),
            Some(AdditionalProperties::Allowed(true)) => expr.push_modifier(Modifier::Passthrough),
            Some(AdditionalProperties::Schema(_)) => {}
            None if self.options.strict_objects => expr.push_modifier(Modifier::Strict),
            None => expr.push_modifier(Modifier::Passthrough),
        }
        Ok(expr)
    }

    /// Translates `allOf`.
    ///
    /// Inline object members are merged into one shape: properties are unioned
    /// (a later member overrides an earlier property of the same name),
    /// `required` is unioned, and the last explicit `additionalProperties` wins.
    /// Properties declared beside `allOf` act as a trailing member, and a bare
    /// `required` beside it applies to the merged shape. References
    /// and non-object members are kept as separate expressions and combined with
    /// the merged shape as an `intersection`, in member order. A required name
    /// only a referenced declaration defines is copied into the merged shape.
    pub(super) fn translate_all_of(
        &mut self,
        node: &SchemaNode,
        ctx: &TranslateContext,
    ) -> CompileResult<ValidationExpr> {
        let members_ctx = ctx.child("allOf");
        let mut merged: Option<SchemaNode> = None;
        let mut merged_slot = None;
        let mut members: Vec<Option<ValidationExpr>> = Vec::with_capacity(node.all_of.len());

        for (i, member) in node.all_of.iter().enumerate() {
            if is_mergeable(member) {
                merge_into(merged.get_or_insert_with(empty_object), member);
                if merged_slot.is_none() {
                    merged_slot = Some(members.len());
                    members.push(None);
                }
            } else {
                let expr = self.translate(member, &members_ctx.child(&i.to_string()))?;
                members.push(Some(expr));
            }
        }

        if !node.properties.is_empty()
            || node.additional_properties.is_some()
            || !node.required.is_empty()
        {
            merge_into(merged.get_or_insert_with(empty_object), node);
            if merged_slot.is_none() {
                merged_slot = Some(members.len());
                members.push(None);
            }
        }

        if let (Some(mut shape), Some(slot)) = (merged, merged_slot) {
            self.adopt_required_properties(&mut shape, &node.all_of, ctx);
            members[slot] = Some(self.translate_object(&shape, ctx)?);
        }

        let mut members: Vec<ValidationExpr> = members.into_iter().flatten().collect();
        if members.len() == 1 {
            return Ok(members.remove(0));
        }
        Ok(ValidationExpr::new(BaseKind::Intersection { members }))
    }

    /// Copies properties that the merged shape requires but does not declare
    /// from the object declarations referenced by `members`, so the
    /// requirement survives the intersection. Names no member declares are
    /// reported.
    fn adopt_required_properties(
        &mut self,
        shape: &mut SchemaNode,
        members: &[SchemaNode],
        ctx: &TranslateContext,
    ) {
        let registry = self.registry;
        let missing: Vec<String> = shape
            .required
            .iter()
            .filter(|name| !shape.properties.contains_key(*name))
            .cloned()
            .collect();

        for name in missing {
            let declared = members
                .iter()
                .filter_map(|member| member.reference.as_deref())
                .filter_map(|reference| registry.resolve(reference).ok())
                .filter_map(|target| registry.get(target))
                .find_map(|target| target.properties.get(&name));
            match declared {
                Some(property) => {
                    shape.properties.insert(name, property.clone());
                }
                None => self.warn(
                    WarningKind::UnsupportedKeyword,
                    &ctx.location,
                    format!(
                        "required property `{}` is not declared by any `allOf` member and was ignored",
                        name
                    ),
                ),
            }
        }
        shape.required.retain(|name| shape.properties.contains_key(name));
    }
}

fn empty_object() -> SchemaNode {
    SchemaNode::of_kind(SchemaKind::Object)
}

/// An inline object shape with nothing that would be lost by merging.
fn is_mergeable(member: &SchemaNode) -> bool {
    member.reference.is_none()
        && !member.is_composed()
        && !member.nullable
        && member.enum_values.is_none()
        && member.const_value.is_none()
        && member.unsupported.is_empty()
        && member.has_object_shape()
}

fn merge_into(target: &mut SchemaNode, member: &SchemaNode) {
    for (name, property) in &member.properties {
        target.properties.insert(name.clone(), property.clone());
    }
    for name in &member.required {
        if !target.required.contains(name) {
            target.required.push(name.clone());
        }
    }
    if member.additional_properties.is_some() {
        target.additional_properties = member.additional_properties.clone();
    }
}
