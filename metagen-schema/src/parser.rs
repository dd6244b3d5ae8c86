//! Meta-model decoder.
//!
//! This module turns raw `metaModel.json` bytes into a [`MetaModel`]. Errors
//! carry the JSON path of the node that failed to decode.

use crate::error::ParseError;
use crate::model::MetaModel;
use std::path::Path;

/// Parses a meta model from a JSON string.
///
/// # Errors
/// Returns `ParseError::Json` if the document is malformed, does not match the
/// meta-model shape, or contains an unrecognized type kind.
pub fn parse_meta_model(json: &str) -> Result<MetaModel, ParseError> {
    let de = &mut serde_json::Deserializer::from_str(json);
    finish(serde_path_to_error::deserialize(de))
}

/// Parses a meta model from raw bytes.
///
/// # Errors
/// Returns `ParseError::Json` under the same conditions as [`parse_meta_model`].
pub fn parse_meta_model_slice(bytes: &[u8]) -> Result<MetaModel, ParseError> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    finish(serde_path_to_error::deserialize(de))
}

/// Reads and parses a meta model file.
///
/// # Errors
/// Returns `ParseError::Io` if the file cannot be read, or `ParseError::Json`
/// if its content cannot be decoded.
pub fn load_meta_model(path: &Path) -> Result<MetaModel, ParseError> {
    let bytes = std::fs::read(path).map_err(|source| ParseError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_meta_model_slice(&bytes)
}

fn finish(
    result: Result<MetaModel, serde_path_to_error::Error<serde_json::Error>>,
) -> Result<MetaModel, ParseError> {
    let model = result.map_err(|err| {
        let path = err.path().to_string();
        ParseError::json(path, err.into_inner().to_string())
    })?;

    tracing::debug!(
        version = %model.meta_data.version,
        requests = model.requests.len(),
        notifications = model.notifications.len(),
        structures = model.structures.len(),
        enumerations = model.enumerations.len(),
        aliases = model.type_aliases.len(),
        "decoded meta model"
    );

    Ok(model)
}
