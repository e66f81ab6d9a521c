//! # Endpoint Binder
//!
//! Maps each [`OperationInput`] onto an [`EndpointDescriptor`]. Parameter,
//! body and response schemas go through the same [`Translator`] as the named
//! declarations, so a schema that is a `$ref` binds as a `namedRef` to the
//! existing declaration and anything else is translated inline.

use super::naming::derive_alias;
use super::{EndpointDescriptor, EndpointParameter, ErrorResponse, RequestFormat, ResponseStatus};
use crate::config::{CompilerOptions, ErrorStatusBehavior};
use crate::error::{CompileError, CompileResult, WarningKind};
use crate::ir::{Modifier, PrimitiveKind, ValidationExpr};
use crate::oas::document::{OperationInput, ResponseInput};
use crate::oas::models::ParamLocation;
use crate::oas::ref_utils::pointer_child;
use crate::schema::SchemaNode;
use crate::translate::{TranslateContext, Translator};
use regex::Regex;

/// Binds operations for one compilation.
pub struct EndpointBinder<'o> {
    options: &'o CompilerOptions,
    path_variable: Regex,
}

impl<'o> EndpointBinder<'o> {
    /// Creates a binder.
    pub fn new(options: &'o CompilerOptions) -> CompileResult<Self> {
        let path_variable = Regex::new(r"\{([^}]+)}")
            .map_err(|e| CompileError::Parse(format!("Invalid path variable pattern: {}", e)))?;
        Ok(Self {
            options,
            path_variable,
        })
    }

    /// Produces the descriptor for `operation`.
    ///
    /// # Errors
    ///
    /// Propagates `UnresolvedReference` from the translator.
    pub fn bind(
        &self,
        translator: &mut Translator<'_>,
        operation: &OperationInput,
    ) -> CompileResult<EndpointDescriptor> {
        let location = pointer_child(
            &pointer_child("#/paths", &operation.path),
            operation.method.as_str(),
        );
        tracing::debug!(method = %operation.method, path = %operation.path, "binding endpoint");

        self.check_path_variables(translator, operation, &location);

        let mut parameters = Vec::with_capacity(operation.parameters.len() + 1);
        let mut request_format = RequestFormat::Json;

        if let Some(body) = &operation.request_body {
            request_format = RequestFormat::from_media_type(body.media_type.as_deref());
            let mut ctx = TranslateContext::at(pointer_child(&location, "requestBody"));
            if let Some(media) = &body.media_type {
                ctx = ctx.child("content").child(media).child("schema");
            }
            let ctx = ctx.with_optional(!body.required);
            parameters.push(EndpointParameter {
                name: "body".to_string(),
                location: ParamLocation::Body,
                description: body.description.clone(),
                schema: self.translate_or_unknown(translator, body.schema.as_ref(), &ctx)?,
            });
        }

        for (i, param) in operation.parameters.iter().enumerate() {
            let ctx = TranslateContext::at(format!("{}/parameters/{}/schema", location, i))
                .with_optional(!param.required && param.location != ParamLocation::Path);
            parameters.push(EndpointParameter {
                name: param.name.clone(),
                location: param.location,
                description: param.description.clone(),
                schema: self.translate_or_unknown(translator, param.schema.as_ref(), &ctx)?,
            });
        }

        let responses = self.parse_statuses(translator, operation, &location);
        let success = select_success(&responses);

        let response = match success {
            Some(idx) => self.translate_response(translator, responses[idx].1, &location)?,
            None => ValidationExpr::primitive(PrimitiveKind::Void),
        };

        let mut errors = Vec::new();
        for (idx, (status, input)) in responses.iter().enumerate() {
            if Some(idx) == success || !self.is_error_status(status) {
                continue;
            }
            errors.push(ErrorResponse {
                status: *status,
                description: input.description.clone(),
                schema: self.translate_response(translator, input, &location)?,
            });
        }
        errors.sort_by(|a, b| a.status.cmp(&b.status));

        let alias = if self.options.with_alias {
            Some(
                operation
                    .operation_id
                    .clone()
                    .unwrap_or_else(|| derive_alias(operation.method, &operation.path)),
            )
        } else {
            None
        };

        Ok(EndpointDescriptor {
            method: operation.method,
            path: operation.path.clone(),
            alias,
            description: operation
                .summary
                .clone()
                .or_else(|| operation.description.clone()),
            request_format,
            parameters,
            response,
            errors,
            deprecated: operation.deprecated,
        })
    }

    fn check_path_variables(
        &self,
        translator: &mut Translator<'_>,
        operation: &OperationInput,
        location: &str,
    ) {
        for cap in self.path_variable.captures_iter(&operation.path) {
            let name = &cap[1];
            let declared = operation
                .parameters
                .iter()
                .any(|p| p.location == ParamLocation::Path && p.name == name);
            if !declared {
                translator.warn(
                    WarningKind::UndeclaredPathParameter,
                    location,
                    format!(
                        "path template '{}' has no path parameter definition for '{}'",
                        operation.path, name
                    ),
                );
            }
        }
    }

    fn parse_statuses<'op>(
        &self,
        translator: &mut Translator<'_>,
        operation: &'op OperationInput,
        location: &str,
    ) -> Vec<(ResponseStatus, &'op ResponseInput)> {
        let responses_location = pointer_child(location, "responses");
        let mut parsed = Vec::with_capacity(operation.responses.len());
        for response in &operation.responses {
            match ResponseStatus::parse(&response.status) {
                Some(status) => parsed.push((status, response)),
                None => translator.warn(
                    WarningKind::UnsupportedKeyword,
                    &pointer_child(&responses_location, &response.status),
                    format!("unrecognised response status '{}' was ignored", response.status),
                ),
            }
        }
        parsed
    }

    fn is_error_status(&self, status: &ResponseStatus) -> bool {
        match self.options.error_status_behavior {
            ErrorStatusBehavior::SpecCompliant => !status.is_success(),
            ErrorStatusBehavior::AutoCorrect => {
                status.is_client_or_server_error() || *status == ResponseStatus::Default
            }
        }
    }

    fn translate_response(
        &self,
        translator: &mut Translator<'_>,
        response: &ResponseInput,
        location: &str,
    ) -> CompileResult<ValidationExpr> {
        let Some(schema) = &response.schema else {
            return Ok(ValidationExpr::primitive(PrimitiveKind::Void));
        };
        let mut ctx = TranslateContext::at(location)
            .child("responses")
            .child(&response.status);
        if let Some(media) = &response.media_type {
            ctx = ctx.child("content").child(media);
        }
        translator.translate(schema, &ctx.child("schema"))
    }

    fn translate_or_unknown(
        &self,
        translator: &mut Translator<'_>,
        schema: Option<&SchemaNode>,
        ctx: &TranslateContext,
    ) -> CompileResult<ValidationExpr> {
        match schema {
            Some(schema) => translator.translate(schema, ctx),
            None if ctx.optional => {
                Ok(ValidationExpr::unknown(None).with_modifier(Modifier::Optional))
            }
            None => Ok(ValidationExpr::unknown(None)),
        }
    }
}

/// Lowest `2xx` code, else the `2XX` range, else `default`.
fn select_success(responses: &[(ResponseStatus, &ResponseInput)]) -> Option<usize> {
    let position = |wanted: fn(&ResponseStatus) -> bool| {
        responses
            .iter()
            .enumerate()
            .filter(|(_, (status, _))| wanted(status))
            .min_by_key(|(_, (status, _))| *status)
            .map(|(idx, _)| idx)
    };
    position(|s| matches!(s, ResponseStatus::Code(c) if (200..300).contains(c)))
        .or_else(|| position(|s| *s == ResponseStatus::Range(2)))
        .or_else(|| position(|s| *s == ResponseStatus::Default))
}
