#![deny(missing_docs)]

//! # Emission Interface
//!
//! Renderers consume a [`CompiledDocument`] and produce text. The compiler
//! itself never writes files or prints; it only hands over the ordered
//! declarations and endpoints through this trait.

use crate::compiler::CompiledDocument;
use crate::error::{CompileError, CompileResult};

/// A renderer for compiled documents.
///
/// Implementors decide the output format (JSON IR, validation-library source,
/// templates). The declaration order of the input must be kept.
pub trait Emitter {
    /// Renders the document.
    fn emit(&self, document: &CompiledDocument) -> CompileResult<String>;
}

/// Emits the IR as JSON.
#[derive(Debug, Clone, Copy)]
pub struct JsonEmitter {
    /// Pretty-print with two-space indentation.
    pub pretty: bool,
}

impl Default for JsonEmitter {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl Emitter for JsonEmitter {
    fn emit(&self, document: &CompiledDocument) -> CompileResult<String> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(document)
        } else {
            serde_json::to_string(document)
        };
        rendered.map_err(|e| CompileError::Parse(format!("Failed to serialize IR: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::Declaration;
    use crate::ir::{PrimitiveKind, ValidationExpr};

    #[test]
    fn test_json_emitter_shape() {
        let document = CompiledDocument {
            declarations: vec![Declaration {
                name: "Name".to_string(),
                expr: ValidationExpr::primitive(PrimitiveKind::String),
            }],
            endpoints: Vec::new(),
            warnings: Vec::new(),
        };
        let out = JsonEmitter { pretty: false }.emit(&document).unwrap();
        assert_eq!(
            out,
            r#"{"declarations":[{"name":"Name","expr":{"kind":"primitive","primitive":"string"}}],"endpoints":[],"warnings":[]}"#
        );
    }
}
