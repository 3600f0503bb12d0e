use std::path::Path;

use futures_util::StreamExt;
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::core::error::{InstallerError, InstallerResult};
use crate::core::progress::{self, ProgressReporter, DOWNLOAD_END};

/// How often to report when the server sends no `Content-Length`.
const UNKNOWN_LENGTH_REPORT_BYTES: u64 = 1024 * 1024;

/// Streams the release archive to disk, reporting into the lower half of the bar.
pub struct Downloader {
    client: Client,
}

impl Downloader {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Download `url` to `dest`, replacing any previous file.
    ///
    /// Returns the number of bytes written.
    pub async fn download_archive(
        &self,
        url: &str,
        dest: &Path,
        reporter: &ProgressReporter,
    ) -> InstallerResult<u64> {
        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(InstallerError::io(parent))?;
            }
        }

        info!("Downloading archive {} -> {:?}", url, dest);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(InstallerError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let total_bytes = response.content_length().filter(|len| *len > 0);
        let mut stream = response.bytes_stream();

        // Write inside a block so the handle is closed before extraction opens the file.
        let downloaded = {
            let mut file = tokio::fs::File::create(dest)
                .await
                .map_err(InstallerError::io(dest))?;

            let mut downloaded = 0_u64;
            let mut last_raw: Option<u8> = None;
            let mut next_unknown_report = UNKNOWN_LENGTH_REPORT_BYTES;

            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                file.write_all(&chunk)
                    .await
                    .map_err(InstallerError::io(dest))?;
                downloaded = downloaded.saturating_add(chunk.len() as u64);

                match total_bytes {
                    Some(total) => {
                        let raw = progress::raw_percent(downloaded, total);
                        if last_raw != Some(raw) {
                            last_raw = Some(raw);
                            reporter.report(
                                progress::download_percent(raw),
                                format!("Downloading... {raw}%"),
                            );
                        }
                    }
                    None if downloaded >= next_unknown_report => {
                        next_unknown_report = downloaded + UNKNOWN_LENGTH_REPORT_BYTES;
                        reporter.report(
                            reporter.current(),
                            format!("Downloading... {} KB", downloaded / 1024),
                        );
                    }
                    None => {}
                }
            }

            file.flush().await.map_err(InstallerError::io(dest))?;
            downloaded
        };

        reporter.report(DOWNLOAD_END, "Download complete. Extracting...");
        debug!("Downloaded {} bytes from {}", downloaded, url);
        Ok(downloaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::core::events::{self, InstallerEvent};
    use crate::core::http;
    use crate::core::test_support::{client, serve, Route};

    fn drain_percents(
        rx: &mut tokio::sync::mpsc::UnboundedReceiver<InstallerEvent>,
    ) -> Vec<(u8, String)> {
        let mut seen = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let InstallerEvent::Progress(p) = event {
                seen.push((p.percent, p.message));
            }
        }
        seen
    }

    #[tokio::test]
    async fn downloads_to_disk_with_lower_half_progress() {
        let body: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        let base = serve(vec![Route::ok("/studio.zip", body.clone())]).await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("nested").join("downloaded.zip");
        let (sender, mut rx) = events::channel();
        let reporter = ProgressReporter::new(sender);

        let downloader = Downloader::new(client());
        let written = downloader
            .download_archive(&format!("{base}/studio.zip"), &dest, &reporter)
            .await
            .unwrap();

        assert_eq!(written, body.len() as u64);
        assert_eq!(std::fs::read(&dest).unwrap(), body);

        let seen = drain_percents(&mut rx);
        assert!(seen.iter().all(|(p, _)| *p <= 50));
        assert!(seen.windows(2).all(|w| w[0].0 <= w[1].0));
        assert_eq!(
            seen.last().unwrap(),
            &(50, "Download complete. Extracting...".to_string())
        );
        assert!(seen.iter().any(|(_, m)| m == "Downloading... 100%"));
    }

    #[tokio::test]
    async fn http_error_status_is_reported() {
        let base = serve(vec![]).await;
        let dir = tempfile::tempdir().unwrap();
        let (sender, _rx) = events::channel();

        let downloader = Downloader::new(client());
        let err = downloader
            .download_archive(
                &format!("{base}/missing.zip"),
                &dir.path().join("downloaded.zip"),
                &ProgressReporter::new(sender),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, InstallerError::DownloadFailed { status: 404, .. }));
    }

    #[tokio::test]
    async fn unknown_length_reports_kilobytes_without_moving_the_bar() {
        let body = vec![7u8; 3 * 1024 * 1024];
        let base = serve(vec![Route::ok("/studio.zip", body.clone()).without_length()]).await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("downloaded.zip");
        let (sender, mut rx) = events::channel();
        let reporter = ProgressReporter::new(sender);

        let written = Downloader::new(client())
            .download_archive(&format!("{base}/studio.zip"), &dest, &reporter)
            .await
            .unwrap();
        assert_eq!(written, body.len() as u64);

        let mut seen = drain_percents(&mut rx);
        assert_eq!(
            seen.pop().unwrap(),
            (50, "Download complete. Extracting...".to_string())
        );
        assert!(seen.len() >= 2);
        assert!(seen.iter().all(|(p, _)| *p == 0));

        let kilobytes: Vec<u64> = seen
            .iter()
            .map(|(_, m)| {
                m.strip_prefix("Downloading... ")
                    .and_then(|rest| rest.strip_suffix(" KB"))
                    .unwrap()
                    .parse()
                    .unwrap()
            })
            .collect();
        assert!(kilobytes.windows(2).all(|w| w[0] < w[1]));
        assert!(kilobytes[0] >= 1024);
    }

    #[tokio::test]
    async fn slow_download_outlasting_the_idle_limit_completes() {
        let body: Vec<u8> = (0..8000u32).map(|i| (i % 13) as u8).collect();
        let base = serve(vec![
            Route::ok("/studio.zip", body.clone()).paced(8, Duration::from_millis(150))
        ])
        .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("downloaded.zip");
        let (sender, _rx) = events::channel();

        // 8 writes 150ms apart run well past the 400ms idle limit in total.
        let client = http::client_builder(Duration::from_millis(400))
            .no_proxy()
            .build()
            .unwrap();
        let written = Downloader::new(client)
            .download_archive(
                &format!("{base}/studio.zip"),
                &dest,
                &ProgressReporter::new(sender),
            )
            .await
            .unwrap();

        assert_eq!(written, body.len() as u64);
        assert_eq!(std::fs::read(&dest).unwrap(), body);
    }

    #[tokio::test]
    async fn stalled_download_is_dropped() {
        let base = serve(vec![
            Route::ok("/studio.zip", vec![1u8; 2000]).paced(2, Duration::from_millis(1500))
        ])
        .await;

        let dir = tempfile::tempdir().unwrap();
        let (sender, _rx) = events::channel();
        let client = http::client_builder(Duration::from_millis(200))
            .no_proxy()
            .build()
            .unwrap();

        let err = Downloader::new(client)
            .download_archive(
                &format!("{base}/studio.zip"),
                &dir.path().join("downloaded.zip"),
                &ProgressReporter::new(sender),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, InstallerError::Http(_)));
    }
}
