//! File retrieval boundary: resolving an opaque file reference to bytes.

use async_trait::async_trait;
use service_core::error::AppError;
use tracing::instrument;

/// Collaborator that turns a file reference (a resolved download URL from
/// the messaging platform) into workbook bytes. Failures here are
/// `DownloadError`, never `ParseError`: the caller must be able to tell a
/// broken download from a broken file.
#[async_trait]
pub trait FileFetcher: Send + Sync {
    async fn fetch(&self, file_url: &str) -> Result<Vec<u8>, AppError>;
}

pub struct HttpFileFetcher {
    client: reqwest::Client,
}

impl HttpFileFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpFileFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileFetcher for HttpFileFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, file_url: &str) -> Result<Vec<u8>, AppError> {
        let response = self
            .client
            .get(file_url)
            .send()
            .await
            .map_err(|e| AppError::DownloadError(anyhow::anyhow!("Failed to download file: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::DownloadError(anyhow::anyhow!(
                "Failed to download file: HTTP {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::DownloadError(anyhow::anyhow!("Failed to read file body: {}", e)))?;

        Ok(bytes.to_vec())
    }
}
