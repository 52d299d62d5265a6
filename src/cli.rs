//! CLI helper functions

use crate::{
    bigquery::{ExtractJobConfig, TableExtractor, TableReference},
    client::{Auth, AuthType, BigQueryClient},
    etl::Extractor,
    storage::{DatasetDestination, DatasetOutputs},
};
use eyre::{Context, Result};
use std::path::Path;
use url::Url;

/// Dataset location used when neither `--location` nor `BQ_LOCATION` is set
pub const DEFAULT_LOCATION: &str = "EU";

/// Resolve the dataset location: flag over `BQ_LOCATION` over the default
pub fn resolve_location(flag: Option<String>) -> String {
    flag.or_else(|| std::env::var("BQ_LOCATION").ok())
        .unwrap_or_else(|| DEFAULT_LOCATION.to_string())
}

/// Load environment variables from a dotenv file
///
/// Pipeline pods inject env directly, so a missing file is fine; a file that
/// exists but cannot be read or parsed is an error.
pub fn load_env_file(path: impl AsRef<Path>) -> Result<()> {
    match dotenvy::from_filename(path.as_ref()) {
        Ok(_) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(err)
            .with_context(|| format!("Failed to load env file: {}", path.as_ref().display())),
    }
}

/// Load BigQuery client from environment variables
///
/// Expected environment variables:
/// - BQ_PROJECT_ID: project that owns and bills submitted jobs (required)
/// - GOOGLE_OAUTH_ACCESS_TOKEN: bearer token for `--auth token` (optional)
/// - BQ_API_BASE_URL: endpoint override for emulators/tests (optional)
pub fn load_bigquery_client(auth_type: &AuthType, location: &str) -> Result<BigQueryClient> {
    let project_id =
        std::env::var("BQ_PROJECT_ID").context("BQ_PROJECT_ID environment variable not set")?;

    let auth = Auth::new(auth_type, std::env::var("GOOGLE_OAUTH_ACCESS_TOKEN").ok());

    let client = BigQueryClient::try_new(project_id, location, auth)
        .context("Failed to create BigQuery client")?;

    match std::env::var("BQ_API_BASE_URL") {
        Ok(base) => {
            let base_url =
                Url::parse(&base).with_context(|| format!("Invalid BQ_API_BASE_URL: {}", base))?;
            Ok(client.with_base_url(base_url))
        }
        Err(_) => Ok(client),
    }
}

/// Parameters of one table extraction
#[derive(Debug, Clone)]
pub struct ExtractParams {
    /// Project that owns the source table
    pub source_project_id: String,
    /// Dataset containing the source table
    pub dataset_id: String,
    /// Source table name
    pub table_name: String,
    /// Base Cloud Storage output path (`gs://...`)
    pub destination_uri: String,
    /// Optional wildcard file pattern appended as a path segment; empty
    /// exports a single file
    pub file_pattern: Option<String>,
    /// Optional extract option overrides (open mapping, validated keys)
    pub job_config: Option<serde_json::Value>,
}

/// Extract a table to Cloud Storage and report the dataset outputs
///
/// Pipeline: TableExtractor → DatasetOutputs
///
/// Table reference and job configuration are validated before the first
/// network call, so a typo'd option key or a bad identifier fails fast.
pub async fn extract_table(
    client: BigQueryClient,
    params: ExtractParams,
) -> Result<DatasetOutputs> {
    let table = TableReference::try_new(
        &params.source_project_id,
        &params.dataset_id,
        &params.table_name,
    )?;
    let config = ExtractJobConfig::from_overrides(params.job_config.clone())?;

    let destination = match &params.file_pattern {
        Some(pattern) => {
            DatasetDestination::new(&params.destination_uri).with_file_pattern(pattern.as_str())
        }
        None => DatasetDestination::new(&params.destination_uri),
    };
    let directory = destination.directory();

    let extractor = TableExtractor::new(client, table, destination, config);
    let uris = extractor.extract().await?;

    Ok(DatasetOutputs::new(directory, uris))
}

/// Verify credentials and project binding with a datasets preflight
pub async fn test_auth(client: &BigQueryClient) -> Result<()> {
    log::info!("Testing connection to {}", client);

    client
        .test_connection()
        .await
        .context("Authorization check failed")?;

    log::info!("✓ Authorized");

    Ok(())
}

/// Read an extract job configuration mapping from a YAML or JSON file
pub fn load_job_config(path: impl AsRef<Path>) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read job config: {}", path.as_ref().display()))?;

    // YAML is a superset of JSON, so one parser covers both
    let value: serde_json::Value = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse job config: {}", path.as_ref().display()))?;

    Ok(value)
}
