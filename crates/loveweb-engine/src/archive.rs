//! Source archives
//!
//! The export path packages the *original* source tree, not the runtime
//! bundle: a zip preserving relative paths exactly as collected.

use std::io::{Cursor, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use loveweb_core::{Error, Result};
use loveweb_sources::CollectedTree;

/// Zip the collected tree in collection order with deflate compression.
pub fn build_source_archive(tree: &CollectedTree) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for dir in &tree.directories {
        writer
            .add_directory(format!("{}/", dir), options)
            .map_err(|e| Error::Other(e.into()))?;
    }
    for file in &tree.files {
        writer
            .start_file(file.relative_path.as_str(), options)
            .map_err(|e| Error::Other(e.into()))?;
        let bytes = std::fs::read(&file.abs_path)?;
        writer.write_all(&bytes)?;
    }

    let cursor = writer.finish().map_err(|e| Error::Other(e.into()))?;
    Ok(cursor.into_inner())
}

/// Verify an uploaded archive parses as a zip before packaging it.
pub fn validate_archive(path: &Path) -> Result<()> {
    let file = std::fs::File::open(path)?;
    ZipArchive::new(file).map_err(|e| Error::ArchiveCorrupt(e.to_string()))?;
    Ok(())
}
