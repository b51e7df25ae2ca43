//! Packaging input variants
//!
//! Inputs arrive as local paths, remote URLs, or inline encoded payloads.
//! Classification happens in exactly one place so the rest of the pipeline
//! never has to sniff strings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where the files to package come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceInput {
    /// A path on local storage; must already exist.
    LocalPath { path: PathBuf },
    /// An `http://` or `https://` URL, fetched with a bounded redirect chain.
    RemoteReference { url: String },
    /// A `data:` URI or bare base64 string carrying the content itself.
    InlinePayload { data: String },
}

impl SourceInput {
    /// Classify a raw input string into its variant.
    ///
    /// `data:` wins over URL detection so a data URI is never mistaken for
    /// a remote reference; anything that is neither is a local path.
    pub fn classify(raw: &str) -> Self {
        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("data:") {
            SourceInput::InlinePayload {
                data: raw.to_string(),
            }
        } else if lower.starts_with("http://") || lower.starts_with("https://") {
            SourceInput::RemoteReference {
                url: raw.to_string(),
            }
        } else {
            SourceInput::LocalPath {
                path: PathBuf::from(raw),
            }
        }
    }

    pub fn local(path: impl Into<PathBuf>) -> Self {
        SourceInput::LocalPath { path: path.into() }
    }

    pub fn inline(data: impl Into<String>) -> Self {
        SourceInput::InlinePayload { data: data.into() }
    }
}
