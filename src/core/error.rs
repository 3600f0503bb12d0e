use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the installer backend.
/// Every module returns `Result<T, InstallerError>`.
#[derive(Debug, Error)]
pub enum InstallerError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Download failed for {url}: HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    // ── Manifest ────────────────────────────────────────
    #[error("Update manifest is empty")]
    EmptyManifest,

    #[error("Update manifest for build {0} has no download URL")]
    MissingDownloadUrl(String),

    // ── Archive ─────────────────────────────────────────
    #[error("Zip extraction error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Archive entry escapes the install directory: {0}")]
    UnsafeArchiveEntry(String),

    // ── Settings ────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Finalize ────────────────────────────────────────
    #[error("Shortcut creation failed: {0}")]
    Shortcut(String),

    #[error("Could not grant permissions on {path:?}: {message}")]
    Permissions { path: PathBuf, message: String },

    // ── Background work ─────────────────────────────────
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Convenience alias used throughout the crate.
pub type InstallerResult<T> = Result<T, InstallerError>;

impl From<std::io::Error> for InstallerError {
    fn from(source: std::io::Error) -> Self {
        InstallerError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

impl InstallerError {
    /// Helper for the common "io failure at this path" mapping.
    pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| InstallerError::Io { path, source }
    }
}
