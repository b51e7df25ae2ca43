//! Input resolution
//!
//! Resolves a `SourceInput` into a readable root path on local storage.
//! Remote and inline inputs are materialized into uniquely named temp
//! files registered with the job's staging set.

use std::path::PathBuf;

use base64::Engine as _;
use percent_encoding::percent_decode_str;
use regex::Regex;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;

use loveweb_core::{DownloadError, Error, Result, SourceInput};

use crate::staging::Staging;

/// Redirect depth bound for remote inputs. The chain is re-resolved
/// manually against the Location header so a loop terminates here.
pub const REDIRECT_LIMIT: usize = 5;

pub struct InputResolver {
    client: reqwest::Client,
}

impl InputResolver {
    pub fn new() -> Self {
        // Redirects are followed by hand so the bound and the terminal
        // status stay observable.
        let client = reqwest::Client::builder()
            .user_agent(concat!("loveweb/", env!("CARGO_PKG_VERSION")))
            .redirect(Policy::none())
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("default reqwest client");
        Self { client }
    }

    /// Resolve the input to a local root (directory or single file).
    pub async fn resolve(&self, input: &SourceInput, staging: &mut Staging) -> Result<PathBuf> {
        match input {
            SourceInput::LocalPath { path } => {
                if tokio::fs::metadata(path).await.is_err() {
                    return Err(Error::InputUnavailable(path.clone()));
                }
                Ok(path.clone())
            }
            SourceInput::RemoteReference { url } => self.download(url, staging).await,
            SourceInput::InlinePayload { data } => {
                let bytes = decode_inline(data)?;
                let path = staging.temp_file("love");
                tokio::fs::write(&path, &bytes).await?;
                Ok(path)
            }
        }
    }

    async fn download(&self, url: &str, staging: &mut Staging) -> Result<PathBuf> {
        let mut url = url.to_string();
        for _ in 0..=REDIRECT_LIMIT {
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| DownloadError::Transport(e.to_string()))?;

            let status = response.status();
            if status.is_redirection() {
                let location = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .ok_or_else(|| {
                        DownloadError::Transport("redirect without Location header".to_string())
                    })?;
                // Location may be relative; resolve it against the
                // redirecting URL.
                url = response
                    .url()
                    .join(location)
                    .map_err(|e| DownloadError::Transport(e.to_string()))?
                    .to_string();
                continue;
            }

            if !status.is_success() {
                return Err(DownloadError::Status(status.as_u16()).into());
            }

            let bytes = response
                .bytes()
                .await
                .map_err(|e| DownloadError::Transport(e.to_string()))?;
            let path = staging.temp_file("love");
            tokio::fs::write(&path, &bytes).await?;
            return Ok(path);
        }
        Err(DownloadError::TooManyRedirects(REDIRECT_LIMIT).into())
    }
}

impl Default for InputResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode an inline payload: either a `data:` URI or a bare base64 string.
pub fn decode_inline(data: &str) -> Result<Vec<u8>> {
    if data.starts_with("data:") {
        decode_data_uri(data)
    } else {
        base64::engine::general_purpose::STANDARD
            .decode(data.trim())
            .map_err(|e| Error::MalformedPayload(format!("invalid base64: {}", e)))
    }
}

fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let re = Regex::new(r"(?s)^data:([^;,]+)?(;base64)?,(.*)$").unwrap();
    let captures = re
        .captures(uri)
        .ok_or_else(|| Error::MalformedPayload("invalid data URL format".to_string()))?;

    let is_base64 = captures.get(2).is_some();
    let payload = captures.get(3).map(|m| m.as_str()).unwrap_or_default();

    if is_base64 {
        base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| Error::MalformedPayload(format!("invalid base64 in data URL: {}", e)))
    } else {
        Ok(percent_decode_str(payload).collect())
    }
}
