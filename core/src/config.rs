#![deny(missing_docs)]

//! # Compiler Options
//!
//! Knobs that change how schemas and operations are compiled. Options are plain
//! data, deserializable from YAML or JSON with camelCase keys, and default to the
//! behavior described for each field.

use crate::error::{CompileError, CompileResult};
use serde::{Deserialize, Serialize};

/// Which non-success statuses become endpoint error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorStatusBehavior {
    /// Every status that is not a 2xx becomes an error, `default` included.
    #[default]
    SpecCompliant,
    /// Only 4xx / 5xx statuses and `default` become errors.
    AutoCorrect,
}

/// Options for a single compilation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompilerOptions {
    /// Objects without explicit `additionalProperties` reject unknown keys
    /// (`strict`) instead of passing them through.
    pub strict_objects: bool,
    /// Emit a `default` modifier for schemas carrying a `default` value.
    pub with_default_values: bool,
    /// Emit a `describe` modifier for schemas carrying a `description`.
    pub with_description: bool,
    /// Attach an alias (operationId, or one derived from method and path) to endpoints.
    pub with_alias: bool,
    /// How error responses are selected.
    pub error_status_behavior: ErrorStatusBehavior,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            strict_objects: false,
            with_default_values: true,
            with_description: false,
            with_alias: true,
            error_status_behavior: ErrorStatusBehavior::default(),
        }
    }
}

impl CompilerOptions {
    /// Parses options from YAML text. JSON is a subset of YAML, so this also
    /// accepts JSON configuration files.
    pub fn from_yaml_str(content: &str) -> CompileResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
            .map_err(|e| CompileError::Parse(format!("Failed to parse compiler options: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = CompilerOptions::default();
        assert!(!opts.strict_objects);
        assert!(opts.with_default_values);
        assert!(!opts.with_description);
        assert!(opts.with_alias);
        assert_eq!(opts.error_status_behavior, ErrorStatusBehavior::SpecCompliant);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let opts = CompilerOptions::from_yaml_str("strictObjects: true\n").unwrap();
        assert!(opts.strict_objects);
        assert!(opts.with_default_values);
    }

    #[test]
    fn test_json_config() {
        let opts = CompilerOptions::from_yaml_str(
            r#"{"withDescription": true, "errorStatusBehavior": "autoCorrect"}"#,
        )
        .unwrap();
        assert!(opts.with_description);
        assert_eq!(opts.error_status_behavior, ErrorStatusBehavior::AutoCorrect);
    }

    #[test]
    fn test_empty_config() {
        assert_eq!(
            CompilerOptions::from_yaml_str("  \n").unwrap(),
            CompilerOptions::default()
        );
    }

    #[test]
    fn test_invalid_config() {
        let err = CompilerOptions::from_yaml_str("errorStatusBehavior: sometimes").unwrap_err();
        assert!(matches!(err, CompileError::Parse(_)));
    }
}
