//! Input resolution and file collection for loveweb
//!
//! Turns a `SourceInput` into a readable local root (downloading or decoding
//! as needed), and walks that root into a deterministic file sequence the
//! bundle builder consumes.

pub mod collect;
pub mod input;
pub mod staging;

pub use collect::{collect, CollectedFile, CollectedTree};
pub use input::InputResolver;
pub use staging::Staging;
