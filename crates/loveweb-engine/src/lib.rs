//! Packaging engine for loveweb
//!
//! Ties the resolved input into the final artifact: bundle building,
//! template rendering, artifact emission, and the job orchestrator that
//! owns temp-resource lifecycle.

pub mod archive;
pub mod assets;
pub mod builder;
pub mod emit;
pub mod orchestrator;
pub mod render;

pub use assets::{AssetCatalog, Flavor};
pub use orchestrator::Orchestrator;
