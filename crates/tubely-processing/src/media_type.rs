//! Declared content type handling.

/// Normalize a declared content type to a bare `type/subtype`.
///
/// Parameters are dropped and the result is lowercased. Returns `None` when
/// the value is not shaped like a media type.
pub fn parse_media_type(declared: &str) -> Option<String> {
    let essence = declared.split(';').next()?.trim().to_ascii_lowercase();
    let (kind, subtype) = essence.split_once('/')?;
    let valid = |part: &str| {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "!#$&-^_.+".contains(c))
    };
    if valid(kind) && valid(subtype) {
        Some(essence)
    } else {
        None
    }
}
