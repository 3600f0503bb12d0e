// ─── Changelog ───
// HTML fragment shown next to the control button, passed through untouched.

use tracing::info;

use crate::core::error::{InstallerError, InstallerResult};
use crate::core::http::METADATA_TIMEOUT;

pub async fn fetch_changelog(client: &reqwest::Client, url: &str) -> InstallerResult<String> {
    info!("Fetching changelog from {}", url);

    let response = client.get(url).timeout(METADATA_TIMEOUT).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(InstallerError::DownloadFailed {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response.text().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::{client, serve, Route};

    #[tokio::test]
    async fn returns_html_as_is() {
        let html = "<h1>Build 12</h1>\n<ul><li>Faster training</li></ul>";
        let base = serve(vec![Route::ok("/changelog.html", html)]).await;

        let body = fetch_changelog(&client(), &format!("{base}/changelog.html"))
            .await
            .unwrap();
        assert_eq!(body, html);
    }

    #[tokio::test]
    async fn missing_page_is_an_error() {
        let base = serve(vec![]).await;
        let err = fetch_changelog(&client(), &format!("{base}/changelog.html"))
            .await
            .unwrap_err();
        assert!(matches!(err, InstallerError::DownloadFailed { status: 404, .. }));
    }
}
