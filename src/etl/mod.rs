//! Extract, Transform, Load (ETL) building blocks
//!
//! Trait seams for composing extraction pipelines: an [`Extractor`] produces
//! items from a source system, a [`Transformer`] reshapes them, and a
//! [`Loader`] persists them. [`Pipeline`] wires the three stages together.

mod extract;
mod load;
mod pipeline;
mod transform;

pub use extract::Extractor;
pub use load::Loader;
pub use pipeline::Pipeline;
pub use transform::{IdentityTransformer, Transformer};
