//! Storage key derivation.
//!
//! Keys follow the layout `<prefix>/<unix-millis>-<filename>`. The filename
//! comes from an untrusted client, so it is sanitized before it is embedded:
//! only the final path component survives, and anything outside
//! `[A-Za-z0-9._-]` is replaced with `_`.
//!
//! Uniqueness is probabilistic: two uploads in the same millisecond with the
//! same filename collide and the later one overwrites the earlier object.

/// Fallback name when sanitization leaves nothing usable.
const FALLBACK_NAME: &str = "file";

/// Derive the storage key for an upload.
///
/// Pure function of `(prefix, now_millis, original_name)`; the caller
/// supplies the timestamp so the derivation stays testable.
pub fn derive_key(prefix: &str, now_millis: u64, original_name: &str) -> String {
    format!("{}/{}-{}", prefix, now_millis, sanitize_filename(original_name))
}

/// Sanitize an untrusted filename for embedding in a storage key.
///
/// Strips any directory components (both `/` and `\` separators), then
/// replaces control characters and anything outside `[A-Za-z0-9._-]`
/// with `_`. Ordinary names like `photo.png` pass through unchanged.
pub fn sanitize_filename(name: &str) -> String {
    // Keep only the final path component
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(name);

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    // A name of only dots could escape the prefix or vanish entirely
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        FALLBACK_NAME.to_string()
    } else {
        cleaned
    }
}
