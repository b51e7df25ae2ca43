//! Scoped temporary resources
//!
//! Every temp file or directory a job creates is registered here at
//! creation time. Cleanup runs when the job reaches a terminal state and
//! again on drop, so cancelled jobs still release their resources.
//! Deletion failures are logged, never propagated; they must not mask the
//! job's primary result.

use std::path::{Path, PathBuf};

use tracing::warn;
use uuid::Uuid;

/// Temp-resource registry owned by one packaging job.
#[derive(Debug, Default)]
pub struct Staging {
    paths: Vec<PathBuf>,
}

impl Staging {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a uniquely named temp file path with the given extension.
    /// The file itself is written by the caller.
    pub fn temp_file(&mut self, extension: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("loveweb-{}.{}", Uuid::new_v4(), extension));
        self.paths.push(path.clone());
        path
    }

    /// Create and register a uniquely named temp directory.
    pub fn temp_dir(&mut self, label: &str) -> std::io::Result<PathBuf> {
        let path = std::env::temp_dir().join(format!("loveweb-{}-{}", label, Uuid::new_v4()));
        std::fs::create_dir_all(&path)?;
        self.paths.push(path.clone());
        Ok(path)
    }

    /// Register an externally created path for cleanup.
    pub fn register(&mut self, path: impl Into<PathBuf>) {
        self.paths.push(path.into());
    }

    /// Best-effort removal of everything registered, in reverse creation
    /// order.
    pub fn cleanup(&mut self) {
        for path in self.paths.drain(..).rev() {
            remove_best_effort(&path);
        }
    }
}

impl Drop for Staging {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn remove_best_effort(path: &Path) {
    let result = match path.metadata() {
        Ok(meta) if meta.is_dir() => std::fs::remove_dir_all(path),
        Ok(_) => std::fs::remove_file(path),
        // Already gone, nothing to do.
        Err(_) => return,
    };
    if let Err(err) = result {
        warn!(path = %path.display(), %err, "failed to remove temp resource");
    }
}
