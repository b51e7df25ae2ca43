//! Bundle builder
//!
//! Concatenates file contents in collection order into one payload and
//! records each file's byte range in the manifest. The manifest must
//! partition the payload exactly; the runtime slices it back apart.

use loveweb_core::{
    is_streamable_audio, Bundle, CreatePath, Error, FileEntry, Result, GAME_ARCHIVE_NAME,
};
use loveweb_sources::CollectedTree;

/// Build the bundle for a collected tree, failing fast if the payload
/// would not fit the configured memory ceiling.
pub async fn build(tree: &CollectedTree, memory_limit: u64) -> Result<Bundle> {
    let mut payload = Vec::new();
    let mut manifest = Vec::with_capacity(tree.files.len());

    for file in &tree.files {
        let bytes = tokio::fs::read(&file.abs_path).await?;
        let start = payload.len() as u64;
        payload.extend_from_slice(&bytes);
        manifest.push(FileEntry {
            filename: file.relative_path.clone(),
            crunched: 0,
            start,
            end: payload.len() as u64,
            audio: is_streamable_audio(&file.relative_path),
        });
    }

    // Checked before any rendering so an oversized bundle costs nothing
    // beyond the reads.
    let required = payload.len() as u64;
    if required > memory_limit {
        return Err(Error::MemoryLimitExceeded {
            required,
            limit: memory_limit,
        });
    }

    let arguments = if tree.is_directory {
        vec!["./".to_string()]
    } else {
        vec![format!("./{}", GAME_ARCHIVE_NAME)]
    };

    Ok(Bundle {
        payload,
        manifest,
        create_paths: create_paths(&tree.directories),
        arguments,
    })
}

/// One creation op per intermediate directory, in walk order (parents
/// before children). Parents are expressed runtime-absolute because the
/// bootstrap mounts at the virtual root.
fn create_paths(directories: &[String]) -> Vec<CreatePath> {
    directories
        .iter()
        .map(|dir| match dir.rsplit_once('/') {
            Some((parent, name)) => CreatePath {
                parent: format!("/{}", parent),
                name: name.to_string(),
            },
            None => CreatePath {
                parent: "/".to_string(),
                name: dir.clone(),
            },
        })
        .collect()
}
