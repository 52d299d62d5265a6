//! BigQuery Dataset Extractor
//!
//! A pipeline-friendly ETL tool for extracting BigQuery tables into Cloud
//! Storage datasets

pub mod bigquery;
pub mod cli;
pub mod client;
pub mod etl;
pub mod storage;

// Re-exports for convenience
pub use bigquery::{ExtractJobConfig, TableExtractor, TableReference};
pub use client::{Auth, AuthType, BigQueryClient};
pub use etl::{Extractor, IdentityTransformer, Loader, Pipeline, Transformer};
pub use storage::{DatasetDestination, DatasetOutputs, OutputsWriter};
