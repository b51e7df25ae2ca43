//! Artifact emission
//!
//! Materializes rendered outputs into their delivery shape. Directory
//! emission writes the file tree under the job's output staging dir and
//! returns the path → bytes map so callers can serialize the whole tree.

use std::collections::BTreeMap;
use std::path::Path;

use loveweb_core::{Bundle, Result};

use crate::assets::{AssetCatalog, Flavor};
use crate::render::RenderedBundle;

/// Write the rendered scripts, the raw payload and the runtime asset set
/// as a file tree rooted at `out_dir`.
pub async fn emit_directory(
    rendered: &RenderedBundle,
    bundle: &Bundle,
    assets: &AssetCatalog,
    flavor: Flavor,
    out_dir: &Path,
) -> Result<BTreeMap<String, Vec<u8>>> {
    let mut files: BTreeMap<String, Vec<u8>> = BTreeMap::new();
    files.insert("index.html".to_string(), rendered.html.clone().into_bytes());
    files.insert("game.js".to_string(), rendered.bootstrap.clone().into_bytes());
    files.insert("game.data".to_string(), bundle.payload.clone());

    for name in flavor.runtime_files() {
        files.insert((*name).to_string(), assets.load(flavor, name).await?);
    }
    for (name, bytes) in assets.theme_files(flavor).await? {
        files.insert(name, bytes);
    }

    for (name, bytes) in &files {
        let path = out_dir.join(name);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, bytes).await?;
    }

    Ok(files)
}
