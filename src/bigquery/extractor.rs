//! BigQuery extract job runner
//!
//! Submits an extract job via POST projects/{project}/jobs and polls
//! jobs.get until the backend reports the job DONE.

use super::{ExtractJobConfig, Job, JobConfigurationExtract, JobReference, TableReference};
use crate::client::BigQueryClient;
use crate::etl::Extractor;
use crate::storage::DatasetDestination;

use eyre::{Context, Result};
use std::time::Duration;

/// How often a submitted job is polled for completion
const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Extractor that materializes a BigQuery table as Cloud Storage files
///
/// Holds everything one extract job needs: the client (bound to the billing
/// project and location), the source table, the destination path and the
/// caller's job options. The wait for completion is unbounded; the backend's
/// own job timeout policy applies.
///
/// # Example
/// ```no_run
/// use bq_dataset_extractor::bigquery::{ExtractJobConfig, TableExtractor, TableReference};
/// use bq_dataset_extractor::client::{Auth, BigQueryClient};
/// use bq_dataset_extractor::etl::Extractor;
/// use bq_dataset_extractor::storage::DatasetDestination;
///
/// # async fn example() -> eyre::Result<()> {
/// let client = BigQueryClient::try_new("proj-a", "EU", Auth::Gcloud)?;
/// let table = TableReference::try_new("proj-b", "ds1", "t1")?;
/// let destination = DatasetDestination::new("gs://bucket/out");
///
/// let extractor = TableExtractor::new(client, table, destination, ExtractJobConfig::default());
/// let uris = extractor.extract().await?;
/// # Ok(())
/// # }
/// ```
pub struct TableExtractor {
    client: BigQueryClient,
    table: TableReference,
    destination: DatasetDestination,
    config: ExtractJobConfig,
}

impl TableExtractor {
    /// Create a new table extractor
    ///
    /// # Arguments
    /// * `client` - Client bound to the project that owns and bills the job
    /// * `table` - Source table to export
    /// * `destination` - Cloud Storage destination path
    /// * `config` - Extract options (format, compression, ...)
    pub fn new(
        client: BigQueryClient,
        table: TableReference,
        destination: DatasetDestination,
        config: ExtractJobConfig,
    ) -> Self {
        Self {
            client,
            table,
            destination,
            config,
        }
    }

    /// Assemble the job submission payload
    fn build_request(&self) -> Job {
        Job::extract(JobConfigurationExtract::new(
            self.table.clone(),
            vec![self.destination.uri()],
            self.config.clone(),
        ))
    }

    /// Submit the extract job and block until it completes
    async fn run_extract_job(&self) -> Result<Job> {
        log::info!(
            "Extract table {} to {}",
            self.table.full_table_id(),
            self.destination.uri()
        );

        let submitted = self
            .client
            .insert_job(&self.build_request())
            .await
            .with_context(|| format!("Failed to submit extract job for table {}", self.table))?;

        let reference = match submitted.job_reference.clone() {
            Some(reference) => reference,
            None => eyre::bail!("Job submission response carried no job reference"),
        };

        log::debug!("Submitted extract job {}", reference.job_id);

        self.wait_for_completion(&reference).await
    }

    /// Poll jobs.get until the job reaches DONE
    ///
    /// A DONE status carrying an `errorResult` is logged (message, structured
    /// error result, error list) and then propagated as the job's error.
    async fn wait_for_completion(&self, reference: &JobReference) -> Result<Job> {
        loop {
            let job = self
                .client
                .get_job(&reference.job_id, reference.location.as_deref())
                .await
                .with_context(|| format!("Failed to poll extract job {}", reference.job_id))?;

            if job.is_done() {
                if let Some(error) = job.error_result() {
                    log::error!("{}", error.message);
                    log::error!("Error result: {:?}", error);
                    log::error!("Errors: {:?}", job.errors());
                    return job.into_result();
                }

                log::debug!("Extract job {} done", reference.job_id);
                return Ok(job);
            }

            log::debug!(
                "Extract job {} not done yet ({:?})",
                reference.job_id,
                job.state()
            );

            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

impl Extractor for TableExtractor {
    type Item = String;

    async fn extract(&self) -> Result<Vec<Self::Item>> {
        let uri = self.destination.uri();

        self.run_extract_job().await?;

        log::info!(
            "✓ Extracted table {} to {}",
            self.table.full_table_id(),
            uri
        );

        Ok(vec![uri])
    }
}
