//! Dataset destinations and pipeline outputs
//!
//! This module handles everything that touches storage paths and files:
//! - Cloud Storage destination URI/directory math
//! - The outputs JSON artifact handed to the orchestrator

mod dataset;
mod outputs;

pub use dataset::{DatasetDestination, parent_dir};
pub use outputs::{DatasetOutputs, OutputsWriter};
