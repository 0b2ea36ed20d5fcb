use uuid::Uuid;

use super::error::StorageError;

/// Issue a fresh object id for a file of the given MIME type.
///
/// Ids are UUIDv7 (time ordered) with an extension guessed from the MIME
/// type, e.g. `01920d3c-….png`. Unknown types get no extension.
pub fn new_object_id(content_type: &str) -> String {
    let id = Uuid::now_v7();
    match extension_for(content_type) {
        Some(ext) => format!("{id}.{ext}"),
        None => id.to_string(),
    }
}

/// Join a public base URL and an object id.
pub fn object_url(public_url: &str, id: &str) -> String {
    format!("{}/{}", public_url.trim_end_matches('/'), id)
}

/// Reject ids that could escape the storage namespace.
pub fn validate_object_id(id: &str) -> Result<&str, StorageError> {
    let valid = !id.is_empty()
        && id.len() <= 128
        && !id.starts_with('.')
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_'));
    if valid {
        Ok(id)
    } else {
        Err(StorageError::InvalidObjectId(id.to_string()))
    }
}

fn extension_for(content_type: &str) -> Option<&'static str> {
    let essence = content_type.split(';').next()?.trim();
    let subtype = essence.split('/').nth(1)?;
    let exts = mime_guess::get_mime_extensions_str(essence)?;
    exts.iter()
        .find(|ext| ext.eq_ignore_ascii_case(subtype))
        .or_else(|| exts.first())
        .copied()
}
