//! JSON Schema check for catalog documents.
//!
//! The pass tolerates any record shape, but the document around the records
//! must be an id→record object or an array of records carrying ids. Checking
//! that up front turns a wrong file into a readable report instead of a pass
//! that silently finds nothing.

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::sync::OnceLock;

const CATALOG_SCHEMA: &str = include_str!("../schema/item_catalog.schema.json");

fn catalog_validator() -> Result<&'static JSONSchema> {
    static VALIDATOR: OnceLock<JSONSchema> = OnceLock::new();
    if let Some(validator) = VALIDATOR.get() {
        return Ok(validator);
    }
    let schema: Value =
        serde_json::from_str(CATALOG_SCHEMA).context("parsing bundled catalog schema")?;
    let compiled = JSONSchema::compile(&schema)
        .map_err(|err| anyhow!("compiling bundled catalog schema: {err}"))?;
    Ok(VALIDATOR.get_or_init(|| compiled))
}

/// Validate the outer shape of a parsed catalog document.
pub(crate) fn validate_catalog_shape(document: &Value) -> Result<()> {
    let validator = catalog_validator()?;
    if let Err(errors) = validator.validate(document) {
        let details = errors
            .map(|err| format!("{}: {}", err.instance_path, err))
            .collect::<Vec<_>>()
            .join("\n");
        bail!("catalog document failed schema validation:\n{details}");
    }
    Ok(())
}
