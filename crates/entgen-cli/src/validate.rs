use entgen_core::DescriptorSet;
use jsonschema::JSONSchema;
use schemars::schema_for;
use serde_json::Value;

use crate::CliError;

/// One structural problem in a descriptor document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// JSON pointer to the offending value (`/` for the document root).
    pub path: String,
    pub message: String,
}

/// JSON Schema of the descriptor input format.
pub fn descriptor_schema() -> Result<Value, CliError> {
    Ok(serde_json::to_value(schema_for!(DescriptorSet))?)
}

/// Check a descriptor document against [`descriptor_schema`].
pub fn validate_descriptor_json(document: &Value) -> Result<Vec<SchemaViolation>, CliError> {
    let schema = descriptor_schema()?;
    let compiled =
        JSONSchema::compile(&schema).map_err(|err| CliError::Schema(err.to_string()))?;

    let mut violations = Vec::new();
    if let Err(errors) = compiled.validate(document) {
        for error in errors {
            let path = error.instance_path.to_string();
            violations.push(SchemaViolation {
                path: if path.is_empty() { "/".to_string() } else { path },
                message: error.to_string(),
            });
        }
    }
    Ok(violations)
}
