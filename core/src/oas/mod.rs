#![deny(missing_docs)]

//! # OpenAPI Input
//!
//! - **shims**: serde structs mapping directly onto OpenAPI objects.
//! - **document**: loader producing the compiler's [`ApiDocument`] input.
//! - **models**: HTTP methods and parameter locations.
//! - **ref_utils**: in-document `$ref` and JSON Pointer helpers.

pub mod document;
pub mod models;
pub(crate) mod ref_utils;
pub mod shims;

pub use document::{
    load_document_json, load_document_yaml, ApiDocument, NamedSchema, OperationInput,
    ParameterInput, RequestBodyInput, ResponseInput,
};
pub use models::{HttpMethod, ParamLocation};
