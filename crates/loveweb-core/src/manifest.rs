//! Bundle manifest types
//!
//! The manifest is the contract between the packager and the runtime's
//! virtual-filesystem bootstrap: an ordered list of byte ranges into one
//! contiguous payload. Field names serialize exactly as the runtime
//! expects them; do not rename.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// File suffixes the runtime streams instead of loading whole.
pub const AUDIO_SUFFIXES: [&str; 5] = [".ogg", ".wav", ".mp3", ".flac", ".xm"];

/// Canonical manifest name when the input is a single packaged archive
/// rather than a file tree.
pub const GAME_ARCHIVE_NAME: &str = "game.love";

/// One logical file inside the bundle payload.
///
/// `filename` is always forward-slash separated and never starts with `/`;
/// the runtime bootstrap prepends the virtual root itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub filename: String,
    pub crunched: u32,
    pub start: u64,
    pub end: u64,
    pub audio: bool,
}

impl FileEntry {
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A virtual-directory creation operation for the runtime bootstrap:
/// "create directory `name` under `parent`".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePath {
    pub parent: String,
    pub name: String,
}

/// The payload + manifest pair consumed by the game runtime.
#[derive(Debug, Clone, Default)]
pub struct Bundle {
    pub payload: Vec<u8>,
    pub manifest: Vec<FileEntry>,
    pub create_paths: Vec<CreatePath>,
    pub arguments: Vec<String>,
}

impl Bundle {
    /// Byte slice of the payload belonging to one manifest entry.
    pub fn slice(&self, entry: &FileEntry) -> &[u8] {
        &self.payload[entry.start as usize..entry.end as usize]
    }

    /// Check that the manifest partitions the payload: contiguous ranges,
    /// starting at zero, ending at the payload length.
    pub fn check_partition(&self) -> Result<()> {
        let mut offset = 0u64;
        for entry in &self.manifest {
            if entry.start != offset || entry.end < entry.start {
                return Err(Error::InvalidInput(format!(
                    "manifest entry {} has range {}..{}, expected start {}",
                    entry.filename, entry.start, entry.end, offset
                )));
            }
            offset = entry.end;
        }
        if offset != self.payload.len() as u64 {
            return Err(Error::InvalidInput(format!(
                "manifest covers {} bytes but payload is {}",
                offset,
                self.payload.len()
            )));
        }
        Ok(())
    }
}

/// Metadata block embedded into the rendered bootstrap script.
#[derive(Debug, Clone, Serialize)]
pub struct BundleMetadata<'a> {
    pub package_uuid: String,
    pub remote_package_size: u64,
    pub files: &'a [FileEntry],
}

/// Whether the runtime should stream this file as audio.
pub fn is_streamable_audio(filename: &str) -> bool {
    AUDIO_SUFFIXES.iter().any(|s| filename.ends_with(s))
}
