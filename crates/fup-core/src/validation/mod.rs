//! Validation modules
//!
//! File names are stored flat under the storage root, so a valid name is non-empty
//! and contains none of `< > : " / \ | ? *` nor control characters `0x00`-`0x1F`.

use std::sync::LazyLock;

use regex::Regex;

static FILE_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^[^<>:"/\\|?*\x00-\x1F]+$"#).expect("file name pattern is valid")
});

/// Check a name supplied with an upload
pub fn is_valid_file_name(name: &str) -> bool {
    FILE_NAME_PATTERN.is_match(name)
}

/// Check a name that is joined onto the storage root (write target or read request).
///
/// On top of [`is_valid_file_name`], `.` and `..` are rejected since they resolve to
/// directories rather than files under the root.
pub fn is_valid_target_name(name: &str) -> bool {
    is_valid_file_name(name) && name != "." && name != ".."
}
