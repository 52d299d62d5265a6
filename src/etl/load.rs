//! Loader trait for loading data to destinations

use eyre::Result;

/// Loader trait for loading items to a destination
///
/// Implementors define how to deliver items to destinations:
/// - Pipeline output files
/// - File systems
///
/// # Example
/// ```no_run
/// use bq_dataset_extractor::etl::Loader;
/// use eyre::Result;
/// use std::path::PathBuf;
///
/// struct UriFileLoader {
///     path: PathBuf,
/// }
///
/// impl Loader for UriFileLoader {
///     type Item = String;
///
///     async fn load(&self, items: Vec<Self::Item>) -> Result<usize> {
///         std::fs::write(&self.path, items.join("\n"))?;
///         Ok(items.len())
///     }
/// }
/// ```
pub trait Loader: Send + Sync {
    /// The type of items to load
    type Item: Send;

    /// Load items to the destination
    ///
    /// Returns the number of items successfully loaded
    ///
    /// # Errors
    /// Returns an error if loading fails (I/O, validation, etc.)
    fn load(&self, items: Vec<Self::Item>) -> impl std::future::Future<Output = Result<usize>> + Send;
}
