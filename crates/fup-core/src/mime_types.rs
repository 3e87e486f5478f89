//! MIME type matching
//!
//! A MIME type is valid when it resolves to a registered file extension, or when it is
//! a category wildcard such as `image/*`. Allow-lists may also contain the bare `*`.

use std::sync::LazyLock;

use regex::Regex;

/// Allow-list entry accepting every type
pub const ALL_TYPES: &str = "*";

/// Preferred extensions where the registry lists several candidates
const CANONICAL_EXTENSIONS: &[(&str, &str)] = &[
    ("application/octet-stream", "bin"),
    ("audio/mpeg", "mp3"),
    ("image/jpeg", "jpeg"),
    ("image/svg+xml", "svg"),
    ("image/tiff", "tiff"),
    ("text/html", "html"),
    ("text/markdown", "md"),
    ("text/plain", "txt"),
    ("video/quicktime", "mov"),
];

static WILDCARD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9-]+/\*$").expect("wildcard pattern is valid"));

/// Canonical extension (without the leading dot) for a known MIME type
pub fn extension_for(mime_type: &str) -> Option<&'static str> {
    let normalized = mime_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase();

    // Exactly one concrete `type/subtype` pair.
    let (category, subtype) = normalized.split_once('/')?;
    if category.is_empty()
        || subtype.is_empty()
        || category == "*"
        || subtype == "*"
        || subtype.contains('/')
    {
        return None;
    }

    let extensions = mime_guess::get_mime_extensions_str(&normalized)?;
    if extensions.is_empty() {
        return None;
    }

    if let Some((_, ext)) = CANONICAL_EXTENSIONS
        .iter()
        .find(|(mime, _)| *mime == normalized)
    {
        return Some(ext);
    }

    extensions
        .iter()
        .find(|ext| **ext == subtype)
        .or_else(|| extensions.first())
        .copied()
}

/// True when the type has a registered file extension
pub fn is_known_mime_type(mime_type: &str) -> bool {
    extension_for(mime_type).is_some()
}

/// True for category wildcards such as `image/*`
pub fn is_wildcard_mime_type(mime_type: &str) -> bool {
    WILDCARD_PATTERN.is_match(mime_type)
}

/// True for a known type or a category wildcard
pub fn is_valid_mime_type(mime_type: &str) -> bool {
    is_known_mime_type(mime_type) || is_wildcard_mime_type(mime_type)
}

/// Validate an allow-list.
///
/// Returns `Ok(())` when the list contains `*` or every entry is valid, otherwise the
/// zero-based index of the first invalid entry.
pub fn validate_allowed_types_list<S: AsRef<str>>(types: &[S]) -> Result<(), usize> {
    if types.iter().any(|t| t.as_ref() == ALL_TYPES) {
        return Ok(());
    }

    match types.iter().position(|t| !is_valid_mime_type(t.as_ref())) {
        Some(index) => Err(index),
        None => Ok(()),
    }
}

/// Check whether `mime_type` is admitted by `allowed_types`
pub fn is_type_included<S: AsRef<str>>(mime_type: &str, allowed_types: &[S]) -> bool {
    if allowed_types.iter().any(|t| t.as_ref() == ALL_TYPES) {
        return true;
    }

    let category = mime_type.split('/').next().unwrap_or("");
    allowed_types.iter().any(|allowed| {
        let allowed = allowed.as_ref();
        if allowed == mime_type {
            return true;
        }
        is_wildcard_mime_type(allowed) && allowed.split('/').next() == Some(category)
    })
}
