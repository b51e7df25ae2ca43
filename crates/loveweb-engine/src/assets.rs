//! Runtime asset catalog
//!
//! The love.js runtime ships as pre-built, read-only asset sets shared by
//! all jobs. Two flavors exist: `release` needs an extra worker file,
//! `compat` trades features for running anywhere (and is the only flavor
//! that fits inside a single document).

use std::path::PathBuf;

use loveweb_core::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Release,
    Compat,
}

impl Flavor {
    pub fn from_compatibility(compatibility: bool) -> Self {
        if compatibility {
            Flavor::Compat
        } else {
            Flavor::Release
        }
    }

    pub fn dir_name(&self) -> &'static str {
        match self {
            Flavor::Release => "release",
            Flavor::Compat => "compat",
        }
    }

    /// The fixed asset set copied alongside the rendered scripts.
    pub fn runtime_files(&self) -> &'static [&'static str] {
        match self {
            Flavor::Release => &["love.js", "love.wasm", "love.worker.js"],
            Flavor::Compat => &["love.js", "love.wasm"],
        }
    }
}

/// Locates runtime assets on disk. Never mutated by jobs.
#[derive(Debug, Clone)]
pub struct AssetCatalog {
    root: PathBuf,
}

impl AssetCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn flavor_dir(&self, flavor: Flavor) -> PathBuf {
        self.root.join(flavor.dir_name())
    }

    pub async fn load(&self, flavor: Flavor, name: &str) -> Result<Vec<u8>> {
        let path = self.flavor_dir(flavor).join(name);
        tokio::fs::read(&path).await.map_err(|e| {
            anyhow::anyhow!("missing runtime asset {}: {}", path.display(), e).into()
        })
    }

    /// The flavor's `theme/` contents as `theme/<name>` → bytes pairs,
    /// name-sorted. Both flavors ship the runtime's default theme
    /// alongside the scripts; an asset set without one yields nothing.
    pub async fn theme_files(&self, flavor: Flavor) -> Result<Vec<(String, Vec<u8>)>> {
        let dir = self.flavor_dir(flavor).join("theme");
        let mut entries = Vec::new();
        let mut reader = match tokio::fs::read_dir(&dir).await {
            Ok(reader) => reader,
            Err(_) => return Ok(entries),
        };
        while let Some(entry) = reader.next_entry().await? {
            if entry.file_type().await?.is_file() {
                let name = entry.file_name().to_string_lossy().into_owned();
                let bytes = tokio::fs::read(entry.path()).await?;
                entries.push((format!("theme/{}", name), bytes));
            }
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flavor_selection() {
        assert_eq!(Flavor::from_compatibility(true), Flavor::Compat);
        assert_eq!(Flavor::from_compatibility(false), Flavor::Release);
    }

    #[test]
    fn test_release_ships_worker() {
        assert!(Flavor::Release.runtime_files().contains(&"love.worker.js"));
        assert!(!Flavor::Compat.runtime_files().contains(&"love.worker.js"));
    }

    #[tokio::test]
    async fn test_theme_files_sorted_and_optional() {
        let dir = tempfile::tempdir().unwrap();
        let theme = dir.path().join("compat/theme");
        std::fs::create_dir_all(&theme).unwrap();
        std::fs::write(theme.join("sound.ogg"), b"OggS").unwrap();
        std::fs::write(theme.join("love.png"), b"\x89PNG").unwrap();

        let catalog = AssetCatalog::new(dir.path());
        let files = catalog.theme_files(Flavor::Compat).await.unwrap();
        let names: Vec<_> = files.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["theme/love.png", "theme/sound.ogg"]);

        // No theme dir on the release side of this catalog.
        assert!(catalog.theme_files(Flavor::Release).await.unwrap().is_empty());
    }
}
