//! JSON Schema validation of the completed document.

use crate::error::StreamError;
use crate::value::Value;

/// A compiled schema, applied once to the fully reconstructed root object.
pub(crate) struct SchemaValidator {
    validator: jsonschema::Validator,
}

impl core::fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SchemaValidator").finish_non_exhaustive()
    }
}

impl SchemaValidator {
    /// Parses and compiles `schema_source`.
    ///
    /// Fails with [`StreamError::Configuration`] when the source is blank,
    /// not JSON, or not a valid schema.
    pub(crate) fn new(schema_source: &str) -> Result<Self, StreamError> {
        if schema_source.trim().is_empty() {
            return Err(StreamError::Configuration {
                message: "schema source is empty".to_string(),
            });
        }

        let schema_json: serde_json::Value =
            serde_json::from_str(schema_source).map_err(|err| StreamError::Configuration {
                message: format!("schema is not valid JSON: {err}"),
            })?;

        let validator =
            jsonschema::validator_for(&schema_json).map_err(|err| StreamError::Configuration {
                message: format!("schema does not compile: {err}"),
            })?;

        Ok(Self { validator })
    }

    /// Validates `value`, collecting every violation into one
    /// [`StreamError::Validation`].
    pub(crate) fn validate(&self, value: &Value) -> Result<(), StreamError> {
        let instance = value.to_json();
        let violations = self
            .validator
            .iter_errors(&instance)
            .map(|err| err.to_string())
            .collect::<Vec<_>>();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(StreamError::Validation {
                violations: violations.join(", "),
            })
        }
    }
}
