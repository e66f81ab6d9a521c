//! # Error Handling
//!
//! Provides the `CompileError` enum for fatal failures and the `CompileWarning`
//! record for recoverable diagnostics collected during a compilation.

use derive_more::{Display, From};
use serde::Serialize;

/// Fatal compilation errors.
///
/// Any of these aborts the whole compilation; no partial output is returned.
#[derive(Debug, Display, From)]
pub enum CompileError {
    /// A `$ref` points to a schema absent from the registry.
    #[from(ignore)]
    #[display("Unresolved reference: {reference}")]
    UnresolvedReference {
        /// The raw `$ref` string.
        reference: String,
    },

    /// Two schemas were registered under the same name.
    #[from(ignore)]
    #[display("Duplicate declaration: {name}")]
    DuplicateDeclaration {
        /// The clashing schema name.
        name: String,
    },

    /// The orderer found a cycle that was not broken by a lazy reference.
    #[from(ignore)]
    #[display("Internal cycle between declarations: {}", names.join(" -> "))]
    InternalCycle {
        /// Declarations left unordered.
        names: Vec<String>,
    },

    /// The input container (YAML/JSON) could not be read into a document.
    #[display("Parse Error: {_0}")]
    Parse(String),

    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for CompileError {}

/// Helper type alias for Result using CompileError.
pub type CompileResult<T> = Result<T, CompileError>;

/// Category of a recoverable diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WarningKind {
    /// A keyword the translator does not model (e.g. `not`, `if`).
    UnsupportedKeyword,
    /// A `type` value outside the JSON Schema primitive set.
    UnsupportedType,
    /// A constraint whose value has the wrong JSON type.
    MalformedConstraint,
    /// A `{name}` in a path template with no matching path parameter.
    UndeclaredPathParameter,
    /// An `anyOf` / `oneOf` / `allOf` with no members.
    EmptyComposition,
}

/// A non-fatal diagnostic returned alongside successful output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileWarning {
    /// Category.
    pub kind: WarningKind,
    /// JSON-pointer-like location of the offending fragment.
    pub location: String,
    /// Human readable detail.
    pub message: String,
}

impl CompileWarning {
    /// Creates a warning.
    pub fn new(kind: WarningKind, location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            location: location.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CompileWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_io_conversion() {
        let io_err = Error::new(ErrorKind::Other, "test");
        let err: CompileError = io_err.into();
        assert!(matches!(err, CompileError::Io(_)));
    }

    #[test]
    fn test_string_conversion_is_parse() {
        let err: CompileError = String::from("bad yaml").into();
        match err {
            CompileError::Parse(s) => assert_eq!(s, "bad yaml"),
            _ => panic!("String should convert to CompileError::Parse"),
        }
    }

    #[test]
    fn test_cycle_display() {
        let err = CompileError::InternalCycle {
            names: vec!["A".into(), "B".into()],
        };
        assert_eq!(err.to_string(), "Internal cycle between declarations: A -> B");
    }

    #[test]
    fn test_unresolved_display() {
        let err = CompileError::UnresolvedReference {
            reference: "#/components/schemas/Missing".into(),
        };
        assert_eq!(
            err.to_string(),
            "Unresolved reference: #/components/schemas/Missing"
        );
    }
}
