//! BigQuery v2 job wire model
//!
//! Request and response shapes for `jobs.insert` / `jobs.get`, limited to the
//! extract job type. Field names are camelCase on the wire; response payloads
//! carry plenty of keys we never read (`kind`, `etag`, `statistics`, ...) and
//! those are ignored on deserialize.
//!
//! Example submission payload:
//! ```json
//! {
//!   "configuration": {
//!     "extract": {
//!       "sourceTable": {"projectId": "proj-b", "datasetId": "ds1", "tableId": "t1"},
//!       "destinationUris": ["gs://bucket/out"]
//!     }
//!   }
//! }
//! ```

use super::TableReference;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};

/// Caller-supplied extract job options
///
/// Built from an open key/value mapping (`--job-config` file or a JSON value);
/// unknown keys are rejected at construction time, before anything touches the
/// network. Values are passed through to the backend untyped beyond their JSON
/// shape, so the backend stays the authority on which values are valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExtractJobConfig {
    /// Output format: `CSV` (default), `NEWLINE_DELIMITED_JSON`, `AVRO` or `PARQUET`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_format: Option<String>,

    /// Output compression: `NONE` (default), `GZIP`, `DEFLATE` or `SNAPPY`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression: Option<String>,

    /// CSV field delimiter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_delimiter: Option<String>,

    /// Whether CSV output starts with a header row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print_header: Option<bool>,

    /// Whether Avro output uses logical types for timestamps and dates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_avro_logical_types: Option<bool>,
}

impl ExtractJobConfig {
    /// Build a configuration from an optional override mapping
    ///
    /// `None` yields the default (empty) configuration. Unknown keys fail here
    /// with the offending key named in the error.
    pub fn from_overrides(overrides: Option<serde_json::Value>) -> Result<Self> {
        match overrides {
            None => Ok(Self::default()),
            Some(value) => {
                serde_json::from_value(value).context("Invalid extract job configuration")
            }
        }
    }
}

/// The `configuration.extract` object of a job submission
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JobConfigurationExtract {
    /// Table being exported
    pub source_table: TableReference,

    /// Cloud Storage destination URI(s), wildcards allowed
    pub destination_uris: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_delimiter: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub print_header: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_avro_logical_types: Option<bool>,
}

impl JobConfigurationExtract {
    /// Combine a source table, destination URIs and caller options into the
    /// wire configuration
    pub fn new(
        source_table: TableReference,
        destination_uris: Vec<String>,
        options: ExtractJobConfig,
    ) -> Self {
        Self {
            source_table,
            destination_uris,
            destination_format: options.destination_format,
            compression: options.compression,
            field_delimiter: options.field_delimiter,
            print_header: options.print_header,
            use_avro_logical_types: options.use_avro_logical_types,
        }
    }
}

/// The `configuration` object of a job
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JobConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extract: Option<JobConfigurationExtract>,

    /// Output-only job type reported by the backend (`EXTRACT`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
}

/// Server-assigned job identity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JobReference {
    pub project_id: String,
    pub job_id: String,

    /// Location the job runs in; echoed back when polling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Lifecycle state of a job
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    Pending,
    Running,
    Done,
}

/// Structured backend error
///
/// `DONE` jobs that failed carry one of these as `errorResult` plus zero or
/// more entries in `errors`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorProto {
    /// Short machine-readable cause, e.g. `invalid` or `notFound`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Human-readable description
    pub message: String,

    /// Where the error occurred (a field path, not a region)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl std::fmt::Display for ErrorProto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.reason {
            Some(reason) => write!(f, "{}: {}", reason, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// The `status` object of a job response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    pub state: JobState,

    /// Present exactly when the job failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_result: Option<ErrorProto>,

    /// All errors encountered; may be non-empty on success (warnings)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorProto>,
}

/// A BigQuery job, as submitted and as polled
///
/// Submissions carry only `configuration`; responses add `jobReference` and
/// `status`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_reference: Option<JobReference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<JobConfiguration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
}

impl Job {
    /// Build an extract job submission (the server assigns the job id)
    pub fn extract(configuration: JobConfigurationExtract) -> Self {
        Self {
            job_reference: None,
            configuration: Some(JobConfiguration {
                extract: Some(configuration),
                job_type: None,
            }),
            status: None,
        }
    }

    /// Server-assigned job id, if the response carried one
    pub fn id(&self) -> Option<&str> {
        self.job_reference.as_ref().map(|r| r.job_id.as_str())
    }

    pub fn state(&self) -> Option<JobState> {
        self.status.as_ref().map(|s| s.state)
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state(), Some(JobState::Done))
    }

    /// The fatal error of a failed job
    pub fn error_result(&self) -> Option<&ErrorProto> {
        self.status.as_ref().and_then(|s| s.error_result.as_ref())
    }

    /// All errors reported for the job (empty when none)
    pub fn errors(&self) -> &[ErrorProto] {
        self.status
            .as_ref()
            .map(|s| s.errors.as_slice())
            .unwrap_or(&[])
    }

    /// Convert a completed job into a result, failing with the backend's
    /// reason and message when the status carries an `errorResult`
    pub fn into_result(self) -> Result<Self> {
        if let Some(error) = self.error_result() {
            eyre::bail!(
                "Extract job {} failed: {}",
                self.id().unwrap_or("unknown"),
                error
            );
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_config_serializes_empty() {
        let config = ExtractJobConfig::default();
        assert_eq!(serde_json::to_string(&config).unwrap(), "{}");
    }

    #[test]
    fn test_from_overrides_none() {
        let config = ExtractJobConfig::from_overrides(None).unwrap();
        assert_eq!(config, ExtractJobConfig::default());
    }

    #[test]
    fn test_from_overrides_applied() {
        let config = ExtractJobConfig::from_overrides(Some(json!({
            "destinationFormat": "AVRO",
            "compression": "SNAPPY",
            "printHeader": false
        })))
        .unwrap();

        assert_eq!(config.destination_format.as_deref(), Some("AVRO"));
        assert_eq!(config.compression.as_deref(), Some("SNAPPY"));
        assert_eq!(config.print_header, Some(false));
        assert_eq!(config.field_delimiter, None);
    }

    #[test]
    fn test_from_overrides_rejects_unknown_key() {
        let err = ExtractJobConfig::from_overrides(Some(json!({
            "bogusKey": true
        })))
        .unwrap_err();

        assert!(format!("{:#}", err).contains("bogusKey"));
    }

    #[test]
    fn test_extract_request_json() {
        let table = TableReference::try_new("proj-b", "ds1", "t1").unwrap();
        let job = Job::extract(JobConfigurationExtract::new(
            table,
            vec!["gs://bucket/out".to_string()],
            ExtractJobConfig::default(),
        ));

        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(
            json["configuration"]["extract"]["sourceTable"]["projectId"],
            "proj-b"
        );
        assert_eq!(
            json["configuration"]["extract"]["destinationUris"],
            json!(["gs://bucket/out"])
        );
        // Submissions carry no server-side fields
        assert!(json.get("jobReference").is_none());
        assert!(json.get("status").is_none());
    }

    #[test]
    fn test_options_reach_the_wire_in_camel_case() {
        let table = TableReference::try_new("proj-b", "ds1", "t1").unwrap();
        let options = ExtractJobConfig {
            destination_format: Some("CSV".to_string()),
            print_header: Some(false),
            ..Default::default()
        };
        let job = Job::extract(JobConfigurationExtract::new(
            table,
            vec!["gs://bucket/out".to_string()],
            options,
        ));

        let json = serde_json::to_string(&job).unwrap();
        assert!(json.contains("\"destinationFormat\":\"CSV\""));
        assert!(json.contains("\"printHeader\":false"));
        assert!(!json.contains("fieldDelimiter"));
    }

    #[test]
    fn test_job_state_wire_names() {
        assert_eq!(serde_json::to_string(&JobState::Done).unwrap(), "\"DONE\"");
        let state: JobState = serde_json::from_str("\"RUNNING\"").unwrap();
        assert_eq!(state, JobState::Running);
    }

    #[test]
    fn test_failed_job_into_result() {
        let job: Job = serde_json::from_value(json!({
            "jobReference": {"projectId": "proj-a", "jobId": "job_123", "location": "EU"},
            "status": {
                "state": "DONE",
                "errorResult": {
                    "reason": "invalid",
                    "message": "Cannot export nested data in CSV format"
                },
                "errors": [
                    {"reason": "invalid", "message": "Cannot export nested data in CSV format"}
                ]
            }
        }))
        .unwrap();

        assert!(job.is_done());
        let err = job.into_result().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("job_123"));
        assert!(message.contains("invalid: Cannot export nested data in CSV format"));
    }

    #[test]
    fn test_successful_job_into_result() {
        let job: Job = serde_json::from_value(json!({
            "jobReference": {"projectId": "proj-a", "jobId": "job_456"},
            "status": {"state": "DONE"}
        }))
        .unwrap();

        assert!(job.into_result().is_ok());
    }

    #[test]
    fn test_error_proto_display() {
        let with_reason = ErrorProto {
            reason: Some("notFound".to_string()),
            message: "Not found: Table proj-b:ds1.missing".to_string(),
            location: None,
        };
        assert_eq!(
            with_reason.to_string(),
            "notFound: Not found: Table proj-b:ds1.missing"
        );

        let bare = ErrorProto {
            reason: None,
            message: "backend error".to_string(),
            location: None,
        };
        assert_eq!(bare.to_string(), "backend error");
    }
}
