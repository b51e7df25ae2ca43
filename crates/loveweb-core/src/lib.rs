//! Core domain models for loveweb
//!
//! This crate contains:
//! - Domain models (SourceInput, Bundle, manifest types, PackagingJob)
//! - The error taxonomy shared by every stage of the pipeline
//!
//! No I/O happens here; resolution, bundling and emission live in the
//! `loveweb-sources` and `loveweb-engine` crates.

pub mod artifact;
pub mod error;
pub mod job;
pub mod manifest;
pub mod source;

pub use artifact::Artifact;
pub use error::{DownloadError, Error, Result};
pub use job::{JobState, PackagingJob, DEFAULT_MEMORY_LIMIT, DEFAULT_TITLE};
pub use manifest::{
    is_streamable_audio, Bundle, BundleMetadata, CreatePath, FileEntry, GAME_ARCHIVE_NAME,
};
pub use source::SourceInput;
