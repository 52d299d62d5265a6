//! BigQuery table extraction
//!
//! Provides the table/job wire model for the BigQuery v2 jobs API and the
//! [`TableExtractor`] that submits an extract job and waits it to completion.

mod extractor;
mod job;
mod table;

pub use extractor::TableExtractor;
pub use job::{
    ErrorProto, ExtractJobConfig, Job, JobConfiguration, JobConfigurationExtract, JobReference,
    JobState, JobStatus,
};
pub use table::TableReference;
