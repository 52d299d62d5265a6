//! Pipeline outputs artifact
//!
//! The outputs file is the contract with the surrounding pipeline: a small
//! JSON document naming the dataset's directory and the extracted URI(s),
//! written where the orchestrator mounts its output parameters.
//!
//! Example format:
//! ```json
//! {
//!   "dataset_gcs_prefix": "gs://bucket/out",
//!   "dataset_gcs_uri": ["gs://bucket/out/part-*.csv"]
//! }
//! ```

use super::parent_dir;
use crate::etl::Loader;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Destination directory and URI list of an extracted dataset
///
/// Field names on the wire are fixed (`dataset_gcs_prefix`,
/// `dataset_gcs_uri`); downstream pipeline steps key on them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatasetOutputs {
    /// Directory the extracted files land in
    #[serde(rename = "dataset_gcs_prefix")]
    pub gcs_prefix: String,

    /// Extracted file URI(s)
    #[serde(rename = "dataset_gcs_uri")]
    pub gcs_uris: Vec<String>,
}

impl DatasetOutputs {
    /// Create outputs from a known prefix and URI list
    pub fn new(gcs_prefix: impl Into<String>, gcs_uris: Vec<String>) -> Self {
        Self {
            gcs_prefix: gcs_prefix.into(),
            gcs_uris,
        }
    }

    /// Derive outputs from a URI list, taking the first URI's parent as the
    /// prefix
    pub fn from_uris(gcs_uris: Vec<String>) -> Result<Self> {
        let first = match gcs_uris.first() {
            Some(first) => first,
            None => eyre::bail!("Cannot derive outputs from an empty URI list"),
        };

        Ok(Self {
            gcs_prefix: parent_dir(first),
            gcs_uris,
        })
    }

    /// Read outputs from a JSON file
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read outputs file: {}", path.as_ref().display())
        })?;

        let outputs: Self = serde_json::from_str(&content)
            .with_context(|| "Failed to parse outputs JSON")?;

        Ok(outputs)
    }

    /// Write outputs to a JSON file
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        // Create parent directory if needed
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)
            .with_context(|| "Failed to serialize outputs to JSON")?;

        std::fs::write(path.as_ref(), json).with_context(|| {
            format!("Failed to write outputs file: {}", path.as_ref().display())
        })?;

        Ok(())
    }

    /// Render the single-line JSON payload printed on stdout
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).with_context(|| "Failed to serialize outputs to JSON")
    }
}

/// Loader that records extracted URIs in the outputs file
///
/// The directory is derived from the first URI; an empty URI list loads
/// nothing and leaves no file behind.
pub struct OutputsWriter {
    path: PathBuf,
}

impl OutputsWriter {
    /// Create a writer targeting the given outputs file path
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Derive outputs from the URIs and write the outputs file
    pub fn write(&self, uris: &[String]) -> Result<DatasetOutputs> {
        let outputs = DatasetOutputs::from_uris(uris.to_vec())?;
        outputs.write(&self.path)?;
        Ok(outputs)
    }
}

impl Loader for OutputsWriter {
    type Item = String;

    async fn load(&self, items: Vec<Self::Item>) -> Result<usize> {
        if items.is_empty() {
            log::warn!("No URIs to record, skipping outputs file");
            return Ok(0);
        }

        let count = items.len();
        self.write(&items)?;

        log::info!("✓ Recorded {} URI(s) to {}", count, self.path.display());

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_uris() {
        let outputs = DatasetOutputs::from_uris(vec!["gs://bucket/out".to_string()]).unwrap();
        assert_eq!(outputs.gcs_prefix, "gs://bucket");
        assert_eq!(outputs.gcs_uris, vec!["gs://bucket/out".to_string()]);
    }

    #[test]
    fn test_from_uris_with_pattern() {
        let outputs =
            DatasetOutputs::from_uris(vec!["gs://bucket/out/part-*.csv".to_string()]).unwrap();
        assert_eq!(outputs.gcs_prefix, "gs://bucket/out");
    }

    #[test]
    fn test_from_uris_empty() {
        let result = DatasetOutputs::from_uris(Vec::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_read_write() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("outputs").join("dataset.json");

        let original = DatasetOutputs::new("gs://bucket", vec!["gs://bucket/out".to_string()]);

        original.write(&path).unwrap();
        assert!(path.exists());

        let loaded = DatasetOutputs::read(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_json_format() {
        let outputs = DatasetOutputs::new("gs://bucket", vec!["gs://bucket/out".to_string()]);
        let json = serde_json::to_string_pretty(&outputs).unwrap();

        assert!(json.contains("\"dataset_gcs_prefix\""));
        assert!(json.contains("\"dataset_gcs_uri\""));
        assert!(!json.contains("gcsPrefix"));
    }

    #[test]
    fn test_to_json_is_single_line() {
        let outputs = DatasetOutputs::new("gs://bucket", vec!["gs://bucket/out".to_string()]);
        let json = outputs.to_json().unwrap();

        assert!(!json.contains('\n'));
        assert!(json.contains("\"dataset_gcs_uri\":[\"gs://bucket/out\"]"));
    }

    #[tokio::test]
    async fn test_loader_writes_outputs_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("outputs.json");

        let writer = OutputsWriter::new(&path);
        let count = writer
            .load(vec!["gs://bucket/out".to_string()])
            .await
            .unwrap();

        assert_eq!(count, 1);
        let outputs = DatasetOutputs::read(&path).unwrap();
        assert_eq!(outputs.gcs_prefix, "gs://bucket");
    }

    #[tokio::test]
    async fn test_loader_skips_empty_list() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("outputs.json");

        let writer = OutputsWriter::new(&path);
        let count = writer.load(Vec::new()).await.unwrap();

        assert_eq!(count, 0);
        assert!(!path.exists());
    }
}
