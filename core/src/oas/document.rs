#![deny(missing_docs)]

//! # Document Loading
//!
//! Reads an OpenAPI document (YAML or JSON) into the compiler's input contract:
//! named schemas plus an ordered list of operations, with every parameter,
//! request body and response resolved against `components`.
//!
//! Only in-document references are followed. A `$ref` into `components` that
//! does not exist is fatal; schema conversion problems are collected as
//! warnings on the returned [`ApiDocument`].

use crate::error::{CompileError, CompileResult, CompileWarning, WarningKind};
use crate::oas::models::{HttpMethod, ParamLocation};
use crate::oas::ref_utils::{extract_component_name, pointer_child, schema_pointer};
use crate::oas::shims::{
    select_media_type, ShimComponents, ShimMediaType, ShimOpenApi, ShimOperation, ShimParameter,
    ShimPathItem, ShimRequestBody, ShimResponse,
};
use crate::schema::{schema_from_json, SchemaNode};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

/// A schema declared under `components/schemas`.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSchema {
    /// Declared name.
    pub name: String,
    /// Schema.
    pub node: SchemaNode,
}

/// A resolved operation parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterInput {
    /// Parameter name.
    pub name: String,
    /// Location.
    pub location: ParamLocation,
    /// Whether the parameter is mandatory. Always true for path parameters.
    pub required: bool,
    /// Description.
    pub description: Option<String>,
    /// Value schema, if declared.
    pub schema: Option<SchemaNode>,
}

/// A resolved request body.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestBodyInput {
    /// Chosen media type.
    pub media_type: Option<String>,
    /// Whether the body is mandatory.
    pub required: bool,
    /// Description.
    pub description: Option<String>,
    /// Payload schema, if declared.
    pub schema: Option<SchemaNode>,
}

/// A resolved response.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseInput {
    /// Status key as written (`200`, `4XX`, `default`).
    pub status: String,
    /// Description.
    pub description: Option<String>,
    /// Chosen media type.
    pub media_type: Option<String>,
    /// Payload schema, if declared.
    pub schema: Option<SchemaNode>,
}

/// One (path, method, operation) triple.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationInput {
    /// Path template.
    pub path: String,
    /// Method.
    pub method: HttpMethod,
    /// `operationId`.
    pub operation_id: Option<String>,
    /// `summary`.
    pub summary: Option<String>,
    /// `description`.
    pub description: Option<String>,
    /// `deprecated`.
    pub deprecated: bool,
    /// Path-level and operation-level parameters, merged.
    pub parameters: Vec<ParameterInput>,
    /// Request body.
    pub request_body: Option<RequestBodyInput>,
    /// Responses in document order.
    pub responses: Vec<ResponseInput>,
}

/// The compiler's input: named schemas plus operations in traversal order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiDocument {
    /// `$self` URI of the document.
    pub self_uri: Option<String>,
    /// Named schemas in document order.
    pub schemas: Vec<NamedSchema>,
    /// Operations: paths in document order, methods in document order within a path.
    pub operations: Vec<OperationInput>,
    /// Warnings raised while converting schemas.
    pub warnings: Vec<CompileWarning>,
}

/// Parses a YAML (or JSON) OpenAPI document.
pub fn load_document_yaml(content: &str) -> CompileResult<ApiDocument> {
    let raw: JsonValue = serde_yaml::from_str(content)
        .map_err(|e| CompileError::Parse(format!("Failed to parse OpenAPI YAML: {}", e)))?;
    load_document_json(raw)
}

/// Builds an [`ApiDocument`] from an already parsed JSON value.
pub fn load_document_json(raw: JsonValue) -> CompileResult<ApiDocument> {
    let shim: ShimOpenApi = serde_json::from_value(raw)
        .map_err(|e| CompileError::Parse(format!("Failed to parse OpenAPI document: {}", e)))?;

    match shim.openapi.as_deref().or(shim.swagger.as_deref()) {
        Some(version) => tracing::debug!(version, "loading document"),
        None => tracing::warn!("document has no `openapi` or `swagger` version field"),
    }

    let mut loader = Loader {
        components: &shim.components,
        self_uri: shim.self_uri.as_deref(),
        warnings: Vec::new(),
    };

    let mut schemas = Vec::with_capacity(shim.components.schemas.len());
    for (name, raw_schema) in &shim.components.schemas {
        let node = schema_from_json(raw_schema, &schema_pointer(name), &mut loader.warnings);
        schemas.push(NamedSchema {
            name: name.clone(),
            node,
        });
    }

    let mut operations = Vec::new();
    for (path, raw_item) in &shim.paths {
        if path.starts_with("x-") {
            continue;
        }
        let item: ShimPathItem = decode(raw_item.clone(), &format!("path item '{}'", path))?;
        let path_location = pointer_child("#/paths", path);
        for (method, operation) in &item.operations {
            let location = pointer_child(&path_location, method.as_str());
            operations.push(loader.operation(
                path,
                *method,
                operation,
                &item.parameters,
                &path_location,
                &location,
            )?);
        }
    }

    tracing::debug!(
        schemas = schemas.len(),
        operations = operations.len(),
        "loaded OpenAPI document"
    );

    Ok(ApiDocument {
        self_uri: shim.self_uri.clone(),
        schemas,
        operations,
        warnings: loader.warnings,
    })
}

fn decode<T: DeserializeOwned>(value: JsonValue, what: &str) -> CompileResult<T> {
    serde_json::from_value(value)
        .map_err(|e| CompileError::Parse(format!("Failed to parse {}: {}", what, e)))
}

/// Longest `$ref` -> `$ref` chain followed inside one components section.
const MAX_REF_CHAIN: usize = 16;

struct Loader<'a> {
    components: &'a ShimComponents,
    self_uri: Option<&'a str>,
    warnings: Vec<CompileWarning>,
}

impl Loader<'_> {
    fn operation(
        &mut self,
        path: &str,
        method: HttpMethod,
        operation: &ShimOperation,
        shared_parameters: &[JsonValue],
        path_location: &str,
        location: &str,
    ) -> CompileResult<OperationInput> {
        let mut parameters: Vec<ParameterInput> = Vec::new();
        let shared = shared_parameters
            .iter()
            .enumerate()
            .map(|(i, p)| (p, format!("{}/parameters/{}", path_location, i)));
        let own = operation
            .parameters
            .iter()
            .enumerate()
            .map(|(i, p)| (p, format!("{}/parameters/{}", location, i)));

        // Operation-level entries replace path-level ones with the same name and location.
        for (raw, param_location) in shared.chain(own) {
            let Some(param) = self.parameter(raw, &param_location)? else {
                continue;
            };
            match parameters
                .iter_mut()
                .find(|p| p.name == param.name && p.location == param.location)
            {
                Some(existing) => *existing = param,
                None => parameters.push(param),
            }
        }

        let request_body = match &operation.request_body {
            Some(raw) => Some(self.request_body(raw, &pointer_child(location, "requestBody"))?),
            None => None,
        };

        let responses_location = pointer_child(location, "responses");
        let mut responses = Vec::with_capacity(operation.responses.len());
        for (status, raw) in &operation.responses {
            if status.starts_with("x-") {
                continue;
            }
            responses.push(self.response(status, raw, &pointer_child(&responses_location, status))?);
        }

        Ok(OperationInput {
            path: path.to_string(),
            method,
            operation_id: operation.operation_id.clone(),
            summary: operation.summary.clone(),
            description: operation.description.clone(),
            deprecated: operation.deprecated,
            parameters,
            request_body,
            responses,
        })
    }

    fn parameter(&mut self, raw: &JsonValue, location: &str) -> CompileResult<Option<ParameterInput>> {
        let (raw, location) = self.resolve_component(raw, "parameters", location)?;
        let param: ShimParameter = decode(raw, &format!("parameter at {}", location))?;

        let Some(param_location) = ParamLocation::from_in(&param.parameter_in) else {
            self.warnings.push(CompileWarning::new(
                WarningKind::UnsupportedKeyword,
                pointer_child(&location, "in"),
                format!(
                    "parameter '{}' uses unsupported location `{}` and was skipped",
                    param.name, param.parameter_in
                ),
            ));
            return Ok(None);
        };

        let schema = match (&param.schema, select_media_type(&param.content)) {
            (Some(schema), _) => Some(self.schema(schema, &pointer_child(&location, "schema"))),
            (None, Some((media, content))) => {
                let media_location = pointer_child(&pointer_child(&location, "content"), media);
                self.media_schema(content, &media_location)
            }
            (None, None) => None,
        };

        Ok(Some(ParameterInput {
            required: param.required || param_location == ParamLocation::Path,
            name: param.name,
            location: param_location,
            description: param.description,
            schema,
        }))
    }

    fn request_body(&mut self, raw: &JsonValue, location: &str) -> CompileResult<RequestBodyInput> {
        let (raw, location) = self.resolve_component(raw, "requestBodies", location)?;
        let body: ShimRequestBody = decode(raw, &format!("request body at {}", location))?;
        let content_location = pointer_child(&location, "content");
        let (media_type, schema) = match select_media_type(&body.content) {
            Some((media, content)) => (
                Some(media.to_string()),
                self.media_schema(content, &pointer_child(&content_location, media)),
            ),
            None => (None, None),
        };
        Ok(RequestBodyInput {
            media_type,
            required: body.required,
            description: body.description,
            schema,
        })
    }

    fn response(&mut self, status: &str, raw: &JsonValue, location: &str) -> CompileResult<ResponseInput> {
        let (raw, location) = self.resolve_component(raw, "responses", location)?;
        let response: ShimResponse = decode(raw, &format!("response at {}", location))?;
        let content_location = pointer_child(&location, "content");
        let (media_type, schema) = match select_media_type(&response.content) {
            Some((media, content)) => (
                Some(media.to_string()),
                self.media_schema(content, &pointer_child(&content_location, media)),
            ),
            None => (None, None),
        };
        Ok(ResponseInput {
            status: status.to_string(),
            description: response.description,
            media_type,
            schema,
        })
    }

    fn media_schema(&mut self, content: &ShimMediaType, location: &str) -> Option<SchemaNode> {
        content
            .schema
            .as_ref()
            .map(|schema| self.schema(schema, &pointer_child(location, "schema")))
    }

    fn schema(&mut self, raw: &JsonValue, location: &str) -> SchemaNode {
        schema_from_json(raw, location, &mut self.warnings)
    }

    /// Follows a `$ref` into `components/{section}`; inline objects are returned as is.
    fn resolve_component(
        &self,
        raw: &JsonValue,
        section: &str,
        location: &str,
    ) -> CompileResult<(JsonValue, String)> {
        self.resolve_component_at(raw, section, location, 0)
    }

    fn resolve_component_at(
        &self,
        raw: &JsonValue,
        section: &str,
        location: &str,
        depth: usize,
    ) -> CompileResult<(JsonValue, String)> {
        let Some(reference) = raw.get("$ref").and_then(JsonValue::as_str) else {
            return Ok((raw.clone(), location.to_string()));
        };
        let unresolved = || CompileError::UnresolvedReference {
            reference: reference.to_string(),
        };
        let name = extract_component_name(reference, self.self_uri, section).ok_or_else(unresolved)?;
        let target = self
            .components
            .section(section)
            .and_then(|entries| entries.get(&name))
            .ok_or_else(unresolved)?;
        let target_location = pointer_child(&format!("#/components/{}", section), &name);
        if target.get("$ref").is_some() {
            if depth >= MAX_REF_CHAIN {
                return Err(unresolved());
            }
            return self.resolve_component_at(target, section, &target_location, depth + 1);
        }
        Ok((target.clone(), target_location))
    }
}
