use cms_types::ContentType;

/// Derive a collision-resistant storage key for an upload.
///
/// The caller's `suggested_name` contributes only the file extension; the
/// rest of the key is `{content_type}/{uuid-v7}`. The v7 token is generated
/// here, never supplied by the caller, so concurrent uploads of files with
/// identical names land under distinct keys and existing blobs are never
/// overwritten.
pub fn derive_key(content_type: ContentType, suggested_name: &str) -> String {
    let token = uuid::Uuid::now_v7();
    format!("{content_type}/{token}.{}", extension_of(suggested_name))
}

/// Extract and sanitize the extension from a suggested filename.
///
/// Lowercased, alphanumeric only, at most 8 characters. Falls back to `bin`
/// when the name has no usable extension.
fn extension_of(name: &str) -> String {
    let ext: String = name
        .rsplit_once('.')
        .map(|(stem, ext)| if stem.is_empty() { "" } else { ext })
        .unwrap_or("")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(8)
        .collect::<String>()
        .to_ascii_lowercase();
    if ext.is_empty() {
        "bin".to_string()
    } else {
        ext
    }
}
