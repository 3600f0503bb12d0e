use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::core::error::{InstallerError, InstallerResult};

pub const SETTINGS_FILE: &str = "installer_settings.json";

const DEFAULT_APP_NAME: &str = "Lithicsoft AI Studio";
const DEFAULT_MANIFEST_URL: &str =
    "https://raw.githubusercontent.com/Lithicsoft/Lithicsoft-Trainer-Studio/refs/heads/main/update.datas";
const DEFAULT_CHANGELOG_URL: &str =
    "https://raw.githubusercontent.com/Lithicsoft/Lithicsoft-Trainer-Studio/refs/heads/main/changelog.html";

/// Everything the installer needs to know about the product it installs.
/// Relative paths are resolved against the working directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InstallerSettings {
    pub app_name: String,
    pub manifest_url: String,
    pub changelog_url: String,
    pub install_dir: PathBuf,
    pub marker_file: PathBuf,
    pub archive_file: PathBuf,
    pub executable_name: String,
}

impl Default for InstallerSettings {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            manifest_url: DEFAULT_MANIFEST_URL.to_string(),
            changelog_url: DEFAULT_CHANGELOG_URL.to_string(),
            install_dir: PathBuf::from(DEFAULT_APP_NAME),
            marker_file: PathBuf::from(".build"),
            archive_file: PathBuf::from("downloaded.zip"),
            executable_name: default_executable_name(),
        }
    }
}

fn default_executable_name() -> String {
    if cfg!(target_os = "windows") {
        format!("{DEFAULT_APP_NAME}.exe")
    } else {
        DEFAULT_APP_NAME.to_string()
    }
}

impl InstallerSettings {
    /// Load `installer_settings.json` from `working_dir`, falling back to the
    /// built-in defaults when it is missing or unreadable.
    pub fn load_or_default(working_dir: &Path) -> Self {
        let path = working_dir.join(SETTINGS_FILE);
        match Self::read(&path) {
            Ok(Some(settings)) => {
                info!("Loaded installer settings from {:?}", path);
                settings
            }
            Ok(None) => Self::default(),
            Err(e) => {
                warn!("Cannot use {:?}: {}; using defaults", path, e);
                Self::default()
            }
        }
    }

    /// `Ok(None)` when the file does not exist.
    pub fn read(path: &Path) -> InstallerResult<Option<Self>> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(InstallerError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }
}
