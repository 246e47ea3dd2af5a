//! JSON course catalog loader.
//!
//! The catalog file is a JSON array of course objects. Entries that fail
//! to deserialize are skipped with a warning rather than failing the whole
//! load, so one malformed record cannot take the catalog offline.

use std::path::Path;

use coursewise_types::course::Course;
use coursewise_types::error::CatalogError;

/// Load the course catalog from a JSON file.
///
/// Returns an error if the file is missing, unreadable, or not a JSON
/// array. Individual entries that do not parse as a [`Course`] are
/// dropped and counted in a warning.
pub async fn load_courses(path: impl AsRef<Path>) -> Result<Vec<Course>, CatalogError> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CatalogError::Io(format!("{}: {e}", path.display())))?;

    let entries: Vec<serde_json::Value> =
        serde_json::from_str(&raw).map_err(|e| CatalogError::Parse(e.to_string()))?;

    if entries.is_empty() {
        return Err(CatalogError::InvalidShape(
            "catalog contains no courses".to_string(),
        ));
    }

    let total = entries.len();
    let mut courses = Vec::with_capacity(total);
    let mut skipped = 0usize;

    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<Course>(entry) {
            Ok(course) => courses.push(course),
            Err(e) => {
                skipped += 1;
                tracing::warn!(index, error = %e, "skipping malformed catalog entry");
            }
        }
    }

    if courses.is_empty() {
        return Err(CatalogError::InvalidShape(format!(
            "all {total} catalog entries were malformed"
        )));
    }

    if skipped > 0 {
        tracing::warn!(loaded = courses.len(), skipped, "catalog loaded with skipped entries");
    } else {
        tracing::info!(loaded = courses.len(), path = %path.display(), "catalog loaded");
    }

    Ok(courses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn write_catalog(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_valid_catalog() {
        let file = write_catalog(
            r#"[
                {"courseId": "CS101", "title": "Intro to Programming", "subjects": ["cs"], "grades": ["9"]},
                {"courseId": "ART200", "title": "Digital Art", "subjects": "art", "grades": "10,11"}
            ]"#,
        );
        let courses = load_courses(file.path()).await.unwrap();
        assert_eq!(courses.len(), 2);
        assert_eq!(courses[1].grades, vec!["10", "11"]);
    }

    #[tokio::test]
    async fn test_malformed_entries_are_skipped() {
        let file = write_catalog(
            r#"[
                {"courseId": "CS101", "title": "Intro to Programming"},
                {"title": "missing id"},
                42
            ]"#,
        );
        let courses = load_courses(file.path()).await.unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].course_id, "CS101");
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let err = load_courses("/nonexistent/courses.json").await.unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }

    #[tokio::test]
    async fn test_non_array_is_parse_error() {
        let file = write_catalog(r#"{"courses": []}"#);
        let err = load_courses(file.path()).await.unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[tokio::test]
    async fn test_empty_array_is_invalid_shape() {
        let file = write_catalog("[]");
        let err = load_courses(file.path()).await.unwrap_err();
        assert!(matches!(err, CatalogError::InvalidShape(_)));
    }

    #[tokio::test]
    async fn test_all_malformed_is_invalid_shape() {
        let file = write_catalog(r#"[{"title": "no id"}, 1]"#);
        let err = load_courses(file.path()).await.unwrap_err();
        assert!(matches!(err, CatalogError::InvalidShape(_)));
    }
}
