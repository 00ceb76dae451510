//! Download adapters: where a document URL is "opened".
//!
//! Opening is fire-and-forget. The caller gets no result; failures are
//! logged here and go no further.

use std::path::{Path, PathBuf};

use cvwizard_shared::CandidateId;
use reqwest::Client;
use tracing::{info, warn};
use url::Url;

/// A document to retrieve for a candidate in a given style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub url: Url,
    pub candidate_id: CandidateId,
    pub style: String,
}

impl DownloadTarget {
    /// `cv_<id>_<style>.pdf`, with path separators stripped from both parts.
    pub fn file_name(&self) -> String {
        let clean = |s: &str| -> String {
            s.chars()
                .map(|c| if c == '/' || c == '\\' { '_' } else { c })
                .collect()
        };
        format!(
            "cv_{}_{}.pdf",
            clean(self.candidate_id.as_str()),
            clean(&self.style)
        )
    }
}

/// Opens a document in a new viewing context.
pub trait DocumentOpener: Send + Sync {
    fn open(&self, target: DownloadTarget);
}

/// Fetches the document on a detached task and saves it to a directory.
///
/// Must be called from within a tokio runtime.
#[derive(Debug, Clone)]
pub struct FileDownloader {
    client: Client,
    output_dir: PathBuf,
}

impl FileDownloader {
    pub fn new(client: Client, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Fetch and write one document, returning the written path.
    pub async fn fetch(&self, target: &DownloadTarget) -> cvwizard_shared::Result<PathBuf> {
        use cvwizard_shared::CvWizardError;

        let response = self
            .client
            .get(target.url.clone())
            .send()
            .await
            .map_err(|e| CvWizardError::Network(format!("{}: {e}", target.url)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CvWizardError::rejected(
                status.as_u16(),
                format!("{}: HTTP {status}", target.url),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CvWizardError::Network(format!("{}: failed to read body: {e}", target.url)))?;

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| CvWizardError::io(&self.output_dir, e))?;

        let path = self.output_dir.join(target.file_name());
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| CvWizardError::io(&path, e))?;

        Ok(path)
    }
}

impl DocumentOpener for FileDownloader {
    fn open(&self, target: DownloadTarget) {
        let downloader = self.clone();
        tokio::spawn(async move {
            match downloader.fetch(&target).await {
                Ok(path) => info!(path = %path.display(), style = %target.style, "document saved"),
                Err(e) => warn!(error = %e, url = %target.url, "document download failed"),
            }
        });
    }
}
