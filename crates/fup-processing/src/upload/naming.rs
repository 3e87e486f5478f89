//! Candidate file names for the naming strategies

use chrono::Utc;
use fup_core::{extension_for, FileBody, FupError, FupResult, NameStrategy, ResolvedUploadOptions};
use uuid::Uuid;

fn canonical_extension(file: &FileBody) -> FupResult<&'static str> {
    extension_for(&file.mime_type).ok_or_else(|| FupError::InvalidMimeType {
        name: file.name.clone(),
    })
}

/// Compute the candidate name for `file` before any middleware runs.
///
/// - `ByDate`: `file-<unix millis>.<ext>`
/// - `ByUuid`: `file-<uuid v4>.<ext>`
/// - `Original`: the uploaded name verbatim
/// - `Explicit`: the caller-supplied name
///
/// `<ext>` is the canonical extension of the declared MIME type. An explicit name
/// passed together with another strategy is ignored.
pub fn resolve_file_name(file: &FileBody, options: &ResolvedUploadOptions) -> FupResult<String> {
    if !options.explicit_name.is_empty() && options.name_strategy != NameStrategy::Explicit {
        tracing::warn!(
            explicit_name = %options.explicit_name,
            strategy = %options.name_strategy,
            "Explicit name ignored because another naming strategy is selected"
        );
    }

    let name = match options.name_strategy {
        NameStrategy::ByDate => format!(
            "file-{}.{}",
            Utc::now().timestamp_millis(),
            canonical_extension(file)?
        ),
        NameStrategy::ByUuid => format!("file-{}.{}", Uuid::new_v4(), canonical_extension(file)?),
        NameStrategy::Original => file.name.clone(),
        NameStrategy::Explicit => options.explicit_name.clone(),
    };

    if name.is_empty() {
        return Err(FupError::EmptyFileName);
    }

    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(strategy: NameStrategy, explicit_name: &str) -> ResolvedUploadOptions {
        ResolvedUploadOptions {
            explicit_name: explicit_name.to_string(),
            allowed_types: vec!["*".to_string()],
            name_strategy: strategy,
            max_file_bytes: 100,
        }
    }

    fn body() -> FileBody {
        FileBody::from_bytes("notes.txt", "text/plain", 0, b"Hi")
    }

    #[test]
    fn test_by_date() {
        let before = Utc::now().timestamp_millis();
        let name = resolve_file_name(&body(), &options(NameStrategy::ByDate, "")).unwrap();
        let after = Utc::now().timestamp_millis();

        let millis: i64 = name
            .strip_prefix("file-")
            .and_then(|rest| rest.strip_suffix(".txt"))
            .unwrap()
            .parse()
            .unwrap();
        assert!(millis >= before && millis <= after);
    }

    #[test]
    fn test_by_uuid() {
        let name = resolve_file_name(&body(), &options(NameStrategy::ByUuid, "")).unwrap();
        let id = name
            .strip_prefix("file-")
            .and_then(|rest| rest.strip_suffix(".txt"))
            .unwrap();
        assert_eq!(Uuid::parse_str(id).unwrap().get_version_num(), 4);
    }

    #[test]
    fn test_original_and_explicit() {
        assert_eq!(
            resolve_file_name(&body(), &options(NameStrategy::Original, "")).unwrap(),
            "notes.txt"
        );
        assert_eq!(
            resolve_file_name(&body(), &options(NameStrategy::Explicit, "a.txt")).unwrap(),
            "a.txt"
        );
    }

    #[test]
    fn test_explicit_name_ignored_for_other_strategies() {
        let name = resolve_file_name(&body(), &options(NameStrategy::Original, "a.txt")).unwrap();
        assert_eq!(name, "notes.txt");
    }

    #[test]
    fn test_empty_explicit_name() {
        let err = resolve_file_name(&body(), &options(NameStrategy::Explicit, "")).unwrap_err();
        assert_eq!(err.to_string(), "Name of file cannot be empty!");
    }
}
