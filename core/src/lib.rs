#![deny(missing_docs)]

//! # OpenAPI Zod Core
//!
//! Compiles the schemas and operations of an OpenAPI document into a
//! validation-expression IR and a list of endpoint descriptors.
//!
//! Pipeline: document loader → schema registry → type translator →
//! dependency orderer → endpoint binder → [`emit::Emitter`].

/// Shared error and warning types.
pub mod error;

/// Compiler options.
pub mod config;

/// OpenAPI document loading.
pub mod oas;

/// Normalized schema model.
pub mod schema;

/// Named schema lookup.
pub mod registry;

/// Validation expression IR.
pub mod ir;

/// Schema to IR translation.
pub mod translate;

/// Declaration ordering.
pub mod graph;

/// Endpoint descriptors and binding.
pub mod endpoints;

/// Compilation entry points.
pub mod compiler;

/// Emission interface.
pub mod emit;

pub use compiler::{compile, compile_yaml, CompiledDocument, Declaration};
pub use config::{CompilerOptions, ErrorStatusBehavior};
pub use emit::{Emitter, JsonEmitter};
pub use endpoints::{
    EndpointDescriptor, EndpointParameter, ErrorResponse, RequestFormat, ResponseStatus,
};
pub use error::{CompileError, CompileResult, CompileWarning, WarningKind};
pub use ir::{BaseKind, Modifier, ObjectProperty, PrimitiveKind, StringFormat, ValidationExpr};
pub use oas::{load_document_json, load_document_yaml, ApiDocument, HttpMethod, ParamLocation};
pub use registry::SchemaRegistry;
pub use schema::{SchemaKind, SchemaNode};
pub use translate::{TranslateContext, Translator};
