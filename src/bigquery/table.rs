//! BigQuery table references
//!
//! A table is addressed by three parts joined with dots:
//! `project.dataset.table`. The parts are validated against BigQuery's
//! identifier rules up front so a bad reference fails before any job is
//! submitted.

use eyre::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Fully-qualified reference to a BigQuery table
///
/// Serializes with the camelCase field names the BigQuery v2 API expects:
/// ```json
/// {"projectId": "proj-b", "datasetId": "ds1", "tableId": "t1"}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TableReference {
    /// Project that owns the table (not necessarily the billing project)
    pub project_id: String,

    /// Dataset containing the table
    pub dataset_id: String,

    /// Table name, optionally with a `$` partition decorator
    pub table_id: String,
}

impl TableReference {
    /// Create a validated table reference
    ///
    /// # Errors
    /// Returns an error when any part is empty or contains characters outside
    /// BigQuery's identifier rules (which also rules out embedded dots that
    /// would make the joined id ambiguous).
    pub fn try_new(
        project_id: impl Into<String>,
        dataset_id: impl Into<String>,
        table_id: impl Into<String>,
    ) -> Result<Self> {
        let project_id = project_id.into();
        let dataset_id = dataset_id.into();
        let table_id = table_id.into();

        if project_id.is_empty() {
            eyre::bail!("Project id must not be empty");
        }
        if dataset_id.is_empty() {
            eyre::bail!("Dataset id must not be empty");
        }
        if table_id.is_empty() {
            eyre::bail!("Table name must not be empty");
        }

        // Project ids are lowercase letters, digits and hyphens
        let project_re = Regex::new(r"^[a-z0-9-]+$")?;
        if !project_re.is_match(&project_id) {
            eyre::bail!("Invalid project id: {}", project_id);
        }

        // Dataset ids are letters, digits and underscores
        let dataset_re = Regex::new(r"^\w+$")?;
        if !dataset_re.is_match(&dataset_id) {
            eyre::bail!("Invalid dataset id: {}", dataset_id);
        }

        // Table names additionally allow a partition decorator ($YYYYMMDD)
        let table_re = Regex::new(r"^[\w$]+$")?;
        if !table_re.is_match(&table_id) {
            eyre::bail!("Invalid table name: {}", table_id);
        }

        Ok(Self {
            project_id,
            dataset_id,
            table_id,
        })
    }

    /// Render the dot-joined `project.dataset.table` id
    pub fn full_table_id(&self) -> String {
        format!("{}.{}.{}", self.project_id, self.dataset_id, self.table_id)
    }
}

impl std::fmt::Display for TableReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_table_id())
    }
}
