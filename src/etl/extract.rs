//! Extractor trait for data extraction from various sources

use eyre::Result;

/// Extractor trait for extracting items from a source
///
/// Implementors define how to produce items from sources like:
/// - Warehouse export jobs
/// - File systems
///
/// # Example
/// ```no_run
/// use bq_dataset_extractor::etl::Extractor;
/// use eyre::Result;
/// use std::path::PathBuf;
///
/// struct UriListExtractor {
///     path: PathBuf,
/// }
///
/// impl Extractor for UriListExtractor {
///     type Item = String;
///
///     async fn extract(&self) -> Result<Vec<Self::Item>> {
///         let content = std::fs::read_to_string(&self.path)?;
///         Ok(content.lines().map(String::from).collect())
///     }
/// }
/// ```
pub trait Extractor: Send + Sync {
    /// The type of items extracted
    type Item: Send;

    /// Extract items from the source
    ///
    /// # Errors
    /// Returns an error if extraction fails (network, I/O, backend job failure, etc.)
    fn extract(&self) -> impl std::future::Future<Output = Result<Vec<Self::Item>>> + Send;
}
