//! Cloud Storage destination path math
//!
//! Pure string manipulation: no bucket client, no existence checks. The
//! backend is the authority on whether a URI is writable or a wildcard
//! pattern is valid.

/// Where extracted files land in Cloud Storage
///
/// Wraps the caller's base output path plus an optional file pattern. With a
/// pattern the effective URI gains one path segment (typically containing a
/// `*` wildcard so the backend shards output); without one the base path is
/// the single output file.
///
/// # Example
/// ```
/// use bq_dataset_extractor::storage::DatasetDestination;
///
/// let single = DatasetDestination::new("gs://bucket/out");
/// assert_eq!(single.uri(), "gs://bucket/out");
/// assert_eq!(single.directory(), "gs://bucket");
///
/// let sharded = DatasetDestination::new("gs://bucket/out").with_file_pattern("part-*.csv");
/// assert_eq!(sharded.uri(), "gs://bucket/out/part-*.csv");
/// assert_eq!(sharded.directory(), "gs://bucket/out");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetDestination {
    base_uri: String,
    file_pattern: Option<String>,
}

impl DatasetDestination {
    /// Create a destination from the base output path
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            file_pattern: None,
        }
    }

    /// Append a file pattern as one path segment
    ///
    /// An empty pattern is treated as no pattern at all: the table is
    /// exported to a single file at the base URI. Wildcard validity is not
    /// checked here; a bad pattern is rejected by the backend when the job
    /// is submitted.
    pub fn with_file_pattern(mut self, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        self.file_pattern = if pattern.is_empty() {
            None
        } else {
            Some(pattern)
        };
        self
    }

    /// The effective destination URI
    pub fn uri(&self) -> String {
        match &self.file_pattern {
            Some(pattern) => format!(
                "{}/{}",
                self.base_uri.trim_end_matches('/'),
                pattern.trim_start_matches('/')
            ),
            None => self.base_uri.clone(),
        }
    }

    /// The directory the extracted files land in (parent of the URI)
    pub fn directory(&self) -> String {
        parent_dir(&self.uri())
    }
}

/// Parent directory of a storage URI
///
/// Truncates at the last `/` after the scheme separator. A bucket-root URI
/// (no path) has no parent and is returned unchanged.
pub fn parent_dir(uri: &str) -> String {
    let path_start = uri.find("://").map(|i| i + 3).unwrap_or(0);
    match uri[path_start..].rfind('/') {
        Some(i) => uri[..path_start + i].to_string(),
        None => uri.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uri_without_pattern() {
        let destination = DatasetDestination::new("gs://bucket/out");
        assert_eq!(destination.uri(), "gs://bucket/out");
        assert_eq!(destination.directory(), "gs://bucket");
    }

    #[test]
    fn test_uri_with_pattern() {
        let destination = DatasetDestination::new("gs://bucket/out").with_file_pattern("part-*.csv");
        assert_eq!(destination.uri(), "gs://bucket/out/part-*.csv");
        assert_eq!(destination.directory(), "gs://bucket/out");
    }

    #[test]
    fn test_empty_pattern_exports_single_file() {
        let destination = DatasetDestination::new("gs://bucket/out").with_file_pattern("");
        assert_eq!(destination, DatasetDestination::new("gs://bucket/out"));
        assert_eq!(destination.uri(), "gs://bucket/out");
        assert_eq!(destination.directory(), "gs://bucket");
    }

    #[test]
    fn test_trailing_slash_base() {
        let destination = DatasetDestination::new("gs://bucket/out/").with_file_pattern("part-*.csv");
        assert_eq!(destination.uri(), "gs://bucket/out/part-*.csv");
    }

    #[test]
    fn test_leading_slash_pattern() {
        let destination = DatasetDestination::new("gs://bucket/out").with_file_pattern("/part-*.csv");
        assert_eq!(destination.uri(), "gs://bucket/out/part-*.csv");
    }

    #[test]
    fn test_nested_path() {
        let destination = DatasetDestination::new("gs://bucket/a/b/c");
        assert_eq!(destination.directory(), "gs://bucket/a/b");
    }

    #[test]
    fn test_parent_of_bucket_root_is_unchanged() {
        assert_eq!(parent_dir("gs://bucket"), "gs://bucket");
    }

    #[test]
    fn test_parent_dir_without_scheme() {
        assert_eq!(parent_dir("bucket/out"), "bucket");
        assert_eq!(parent_dir("bucket"), "bucket");
    }
}
