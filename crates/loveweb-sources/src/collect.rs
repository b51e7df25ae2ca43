//! File collection
//!
//! Walks a resolved root into an ordered file sequence. Ordering is
//! depth-first and name-sorted so byte offsets derived from it are
//! reproducible across identical inputs.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use loveweb_core::{Error, Result, GAME_ARCHIVE_NAME};

/// One regular file found under the root.
#[derive(Debug, Clone)]
pub struct CollectedFile {
    pub abs_path: PathBuf,
    /// Forward-slash relative path; never starts with `/`.
    pub relative_path: String,
    pub size: u64,
}

/// The full collection result for one resolved root.
#[derive(Debug, Clone)]
pub struct CollectedTree {
    pub root: PathBuf,
    pub is_directory: bool,
    pub files: Vec<CollectedFile>,
    /// Relative paths of every intermediate directory, parents before
    /// children. Needed for virtual-filesystem path creation even though
    /// directories are not manifest entries.
    pub directories: Vec<String>,
}

/// Enumerate the root. A single-file root yields exactly one entry under
/// the canonical archive name; a directory root yields every regular file
/// beneath it.
pub fn collect(root: &Path) -> Result<CollectedTree> {
    let meta = std::fs::metadata(root).map_err(|_| Error::InputUnavailable(root.to_path_buf()))?;

    if !meta.is_dir() {
        return Ok(CollectedTree {
            root: root.to_path_buf(),
            is_directory: false,
            files: vec![CollectedFile {
                abs_path: root.to_path_buf(),
                relative_path: GAME_ARCHIVE_NAME.to_string(),
                size: meta.len(),
            }],
            directories: Vec::new(),
        });
    }

    let mut files = Vec::new();
    let mut directories = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::Other(e.into()))?;
        if entry.path() == root {
            continue;
        }
        let relative = relative_slash(root, entry.path())?;
        if entry.file_type().is_dir() {
            directories.push(relative);
        } else if entry.file_type().is_file() {
            let size = entry.metadata().map_err(|e| Error::Other(e.into()))?.len();
            files.push(CollectedFile {
                abs_path: entry.path().to_path_buf(),
                relative_path: relative,
                size,
            });
        }
        // Symlinks and other special entries are skipped.
    }

    Ok(CollectedTree {
        root: root.to_path_buf(),
        is_directory: true,
        files,
        directories,
    })
}

/// Root-relative path in forward-slash form, independent of the host
/// separator.
fn relative_slash(root: &Path, path: &Path) -> Result<String> {
    let rel = path
        .strip_prefix(root)
        .map_err(|e| Error::Other(e.into()))?;
    Ok(rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/"))
}
