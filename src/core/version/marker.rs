use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::error::{InstallerError, InstallerResult};

/// Local file holding the build id of the last completed install.
#[derive(Debug, Clone)]
pub struct VersionMarker {
    path: PathBuf,
}

impl VersionMarker {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// `None` when no install has completed yet.
    pub async fn read(&self) -> InstallerResult<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(Some(raw.trim().to_string())),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(InstallerError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    pub async fn write(&self, build: &str) -> InstallerResult<()> {
        tokio::fs::write(&self.path, build)
            .await
            .map_err(InstallerError::io(&self.path))?;
        debug!("Version marker {:?} set to {}", self.path, build);
        Ok(())
    }
}
