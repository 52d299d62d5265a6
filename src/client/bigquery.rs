//! BigQuery client module
//!
//! Provides `BigQueryClient` for making requests to the BigQuery v2 REST API.
//! The client is bound to one billing project and one dataset location.

use super::Auth;
use crate::bigquery::Job;
use eyre::{Context, Result, eyre};
use reqwest::Client;
use url::Url;

/// Public BigQuery v2 endpoint
const DEFAULT_BASE_URL: &str = "https://bigquery.googleapis.com/bigquery/v2/";

/// BigQuery v2 API client
///
/// Bound to a single project (job billing/ownership) and dataset location for
/// its lifetime; each tool invocation builds a fresh client. Authentication is
/// resolved once and baked into the HTTP client's default headers.
///
/// # Example
/// ```no_run
/// use bq_dataset_extractor::client::{Auth, BigQueryClient};
///
/// # async fn example() -> eyre::Result<()> {
/// let client = BigQueryClient::try_new("proj-a", "EU", Auth::Gcloud)?;
///
/// // Preflight: verifies credentials and project binding
/// client.test_connection().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct BigQueryClient {
    client: Client,
    base_url: Url,
    project_id: String,
    location: String,
}

impl BigQueryClient {
    /// Create a new BigQueryClient from a project id, location, and Auth.
    ///
    /// # Arguments
    /// * `project_id` - Project that owns and bills submitted jobs
    /// * `location` - Dataset location jobs run in (e.g. `EU`, `US`)
    /// * `auth` - Authentication method
    ///
    /// # Errors
    /// Returns an error if token resolution fails or the HTTP client cannot
    /// be built.
    pub fn try_new(
        project_id: impl Into<String>,
        location: impl Into<String>,
        auth: Auth,
    ) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(token) = auth.bearer_token()? {
            headers.insert(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", token).parse()?,
            );
        }
        let client = Client::builder().default_headers(headers).build()?;
        let base_url = Url::parse(DEFAULT_BASE_URL)?;

        Ok(Self {
            client,
            base_url,
            project_id: project_id.into(),
            location: location.into(),
        })
    }

    /// Override the API endpoint (emulators, tests)
    ///
    /// A trailing slash is enforced so relative joins keep the endpoint path.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        let mut base_url = base_url;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        self.base_url = base_url;
        self
    }

    /// Get the bound project id.
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Get the bound dataset location.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Get the API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn jobs_url(&self) -> Result<Url> {
        Ok(self
            .base_url
            .join(&format!("projects/{}/jobs", self.project_id))?)
    }

    fn job_url(&self, job_id: &str) -> Result<Url> {
        Ok(self
            .base_url
            .join(&format!("projects/{}/jobs/{}", self.project_id, job_id))?)
    }

    fn datasets_url(&self) -> Result<Url> {
        Ok(self
            .base_url
            .join(&format!("projects/{}/datasets", self.project_id))?)
    }

    /// Submit a job via POST projects/{project}/jobs.
    ///
    /// The response echoes the job back with its server-assigned reference
    /// and initial status.
    pub async fn insert_job(&self, job: &Job) -> Result<Job> {
        let url = self.jobs_url()?;

        log::trace!("POST {}", url);

        let response = self
            .client
            .post(url)
            .json(job)
            .send()
            .await
            .map_err(|e| eyre!("Failed to send job submission request: {}", e))?;

        Self::read_job(response, "submit job").await
    }

    /// Fetch a job via GET projects/{project}/jobs/{job_id}.
    ///
    /// The location falls back to the client's bound location when the job
    /// reference carried none.
    pub async fn get_job(&self, job_id: &str, location: Option<&str>) -> Result<Job> {
        let url = self.job_url(job_id)?;
        let location = location.unwrap_or(&self.location);

        log::trace!("GET {} (location: {})", url, location);

        let response = self
            .client
            .get(url)
            .query(&[("location", location)])
            .send()
            .await
            .map_err(|e| eyre!("Failed to send job poll request: {}", e))?;

        Self::read_job(response, "fetch job").await
    }

    /// Verify the connection and authentication to BigQuery.
    ///
    /// Lists at most one dataset in the bound project; any credential or
    /// project-binding problem surfaces here without submitting a job.
    pub async fn test_connection(&self) -> Result<reqwest::Response> {
        let url = self.datasets_url()?;

        let response = self
            .client
            .get(url)
            .query(&[("maxResults", "1")])
            .send()
            .await
            .map_err(|e| eyre!("Failed to send connection test request: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            eyre::bail!("Connection test failed ({}): {}", status, body);
        }

        Ok(response)
    }

    /// Decode a job payload, surfacing non-2xx bodies verbatim.
    async fn read_job(response: reqwest::Response, action: &str) -> Result<Job> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            eyre::bail!("Failed to {} ({}): {}", action, status, body);
        }

        response
            .json::<Job>()
            .await
            .with_context(|| format!("Failed to parse {} response", action))
    }
}

impl std::fmt::Display for BigQueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (project: {}, location: {})",
            self.base_url, self.project_id, self.location
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_defaults() {
        let client = BigQueryClient::try_new("proj-a", "EU", Auth::None).unwrap();

        assert_eq!(client.project_id(), "proj-a");
        assert_eq!(client.location(), "EU");
        assert_eq!(
            client.base_url().as_str(),
            "https://bigquery.googleapis.com/bigquery/v2/"
        );
    }

    #[test]
    fn test_base_url_override_gets_trailing_slash() {
        let base = Url::parse("http://localhost:9050/bigquery/v2").unwrap();
        let client = BigQueryClient::try_new("proj-a", "EU", Auth::None)
            .unwrap()
            .with_base_url(base);

        assert_eq!(
            client.base_url().as_str(),
            "http://localhost:9050/bigquery/v2/"
        );
    }

    #[test]
    fn test_endpoint_urls() {
        let client = BigQueryClient::try_new("proj-a", "EU", Auth::None).unwrap();

        assert_eq!(
            client.jobs_url().unwrap().as_str(),
            "https://bigquery.googleapis.com/bigquery/v2/projects/proj-a/jobs"
        );
        assert_eq!(
            client.job_url("job_123").unwrap().as_str(),
            "https://bigquery.googleapis.com/bigquery/v2/projects/proj-a/jobs/job_123"
        );
        assert_eq!(
            client.datasets_url().unwrap().as_str(),
            "https://bigquery.googleapis.com/bigquery/v2/projects/proj-a/datasets"
        );
    }

    #[test]
    fn test_endpoint_urls_with_override() {
        let base = Url::parse("http://localhost:9050/bigquery/v2").unwrap();
        let client = BigQueryClient::try_new("proj-a", "EU", Auth::None)
            .unwrap()
            .with_base_url(base);

        assert_eq!(
            client.jobs_url().unwrap().as_str(),
            "http://localhost:9050/bigquery/v2/projects/proj-a/jobs"
        );
    }

    #[test]
    fn test_display() {
        let client = BigQueryClient::try_new("proj-a", "EU", Auth::None).unwrap();
        assert_eq!(
            client.to_string(),
            "https://bigquery.googleapis.com/bigquery/v2/ (project: proj-a, location: EU)"
        );
    }
}
