//! Reading and writing the on-disk document format: a single JSON array of
//! section objects. Parsing is tolerant of *missing* keys (they take
//! defaults) and of unknown keys (preserved for re-emit), but strict about
//! shape: anything that is not an array of objects, or a recognized key
//! with the wrong structure, aborts the load so a later save cannot
//! silently drop data.

use crate::error::{MenuError, Result};
use crate::model::Document;

/// Parses raw document text. The caller keeps its current state when this
/// fails; a parse error never half-loads.
pub fn parse_document(raw: &str) -> Result<Document> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| MenuError::Format(format!("not valid JSON: {}", e)))?;

    let items = value
        .as_array()
        .ok_or_else(|| MenuError::Format("top level must be an array of sections".to_string()))?;

    if let Some(idx) = items.iter().position(|item| !item.is_object()) {
        return Err(MenuError::Format(format!(
            "section at index {} is not an object",
            idx
        )));
    }

    let document: Document = serde_json::from_value(value)
        .map_err(|e| MenuError::Format(format!("malformed section: {}", e)))?;
    Ok(document)
}

/// Serializes the document as pretty-printed JSON. Section order and
/// keyboard order come out exactly as held in memory; absent attachments
/// and absent callback data are omitted rather than written as null.
pub fn serialize_document(document: &Document) -> Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}
