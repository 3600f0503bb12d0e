// ─── Update Manifest ───
// Two lines of plain text: latest build id, then the archive URL.

use tracing::info;

use crate::core::error::{InstallerError, InstallerResult};
use crate::core::http::METADATA_TIMEOUT;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteManifest {
    pub latest_build: String,
    /// Empty when the manifest only names a build.
    pub download_url: String,
}

impl RemoteManifest {
    /// Parse the manifest body. Blank lines anywhere are skipped, so
    /// trailing newlines and CRLF endings are fine.
    pub fn parse(raw: &str) -> InstallerResult<Self> {
        let mut lines = raw
            .split(['\r', '\n'])
            .map(str::trim)
            .filter(|line| !line.is_empty());

        let latest_build = lines.next().ok_or(InstallerError::EmptyManifest)?;
        let download_url = lines.next().unwrap_or_default();

        Ok(Self {
            latest_build: latest_build.to_string(),
            download_url: download_url.to_string(),
        })
    }

    /// Fetch and parse the manifest using a shared HTTP client.
    pub async fn fetch(client: &reqwest::Client, url: &str) -> InstallerResult<Self> {
        info!("Fetching update manifest from {}", url);

        let response = client.get(url).timeout(METADATA_TIMEOUT).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(InstallerError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let manifest = Self::parse(&response.text().await?)?;
        info!("Latest build on server: {}", manifest.latest_build);
        Ok(manifest)
    }

    pub fn require_download_url(&self) -> InstallerResult<&str> {
        if self.download_url.is_empty() {
            return Err(InstallerError::MissingDownloadUrl(self.latest_build.clone()));
        }
        Ok(&self.download_url)
    }
}
