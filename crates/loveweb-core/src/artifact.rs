//! Final deliverable shapes

use std::collections::BTreeMap;

/// What a packaging job ultimately produces.
#[derive(Debug, Clone)]
pub enum Artifact {
    /// Rendered scripts, payload and runtime assets as relative-path → bytes.
    /// A `BTreeMap` keeps serialization order stable.
    DirectoryTree(BTreeMap<String, Vec<u8>>),
    /// One self-contained HTML document with everything inlined.
    SingleDocument(Vec<u8>),
    /// The original source tree as a compressed zip archive, not a runtime
    /// bundle.
    SourceArchive(Vec<u8>),
}

impl Artifact {
    pub fn kind(&self) -> &'static str {
        match self {
            Artifact::DirectoryTree(_) => "directory_tree",
            Artifact::SingleDocument(_) => "single_document",
            Artifact::SourceArchive(_) => "source_archive",
        }
    }
}
