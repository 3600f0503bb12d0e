use std::path::{Path, PathBuf};

use reqwest::Client;

use crate::core::downloader::Downloader;
use crate::core::error::InstallerResult;
use crate::core::http::build_http_client;
use crate::core::shortcut::{self, ShortcutLocations};
use crate::core::version::VersionMarker;

use super::settings::InstallerSettings;

/// Shared, read-only state handed to commands and the background worker.
pub struct AppState {
    pub working_dir: PathBuf,
    pub settings: InstallerSettings,
    pub http_client: Client,
    pub downloader: Downloader,
    pub marker: VersionMarker,
    /// `None` means the user's real Desktop and Start Menu folders.
    shortcut_locations: Option<ShortcutLocations>,
}

impl AppState {
    /// State for `working_dir`, reading `installer_settings.json` if present.
    pub fn new(working_dir: PathBuf) -> InstallerResult<Self> {
        let settings = InstallerSettings::load_or_default(&working_dir);
        let client = build_http_client()?;
        Ok(Self::with_settings(working_dir, settings, client))
    }

    pub fn with_settings(working_dir: PathBuf, settings: InstallerSettings, client: Client) -> Self {
        let marker = VersionMarker::new(working_dir.join(&settings.marker_file));
        Self {
            downloader: Downloader::new(client.clone()),
            http_client: client,
            marker,
            settings,
            working_dir,
            shortcut_locations: None,
        }
    }

    pub fn with_shortcut_locations(mut self, locations: ShortcutLocations) -> Self {
        self.shortcut_locations = Some(locations);
        self
    }

    pub fn install_dir(&self) -> PathBuf {
        self.resolve(&self.settings.install_dir)
    }

    pub fn archive_path(&self) -> PathBuf {
        self.resolve(&self.settings.archive_file)
    }

    pub fn executable_path(&self) -> PathBuf {
        self.install_dir().join(&self.settings.executable_name)
    }

    pub fn shortcut_locations(&self) -> InstallerResult<ShortcutLocations> {
        match &self.shortcut_locations {
            Some(locations) => Ok(locations.clone()),
            None => shortcut::default_locations(),
        }
    }

    /// Both the marker and the install directory are present.
    pub fn is_installed(&self) -> bool {
        self.marker.exists() && self.install_dir().is_dir()
    }

    pub fn window_title(&self, build: &str) -> String {
        format!("{} Installer | Build: {}", self.settings.app_name, build)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(dir: &Path) -> AppState {
        AppState::with_settings(
            dir.to_path_buf(),
            InstallerSettings::default(),
            reqwest::Client::new(),
        )
    }

    #[test]
    fn paths_resolve_against_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(dir.path());

        assert_eq!(state.install_dir(), dir.path().join("Lithicsoft AI Studio"));
        assert_eq!(state.archive_path(), dir.path().join("downloaded.zip"));
        assert_eq!(state.marker.path(), dir.path().join(".build"));
        assert!(state.executable_path().starts_with(state.install_dir()));
    }

    #[test]
    fn absolute_install_dir_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        let settings = InstallerSettings {
            install_dir: elsewhere.path().to_path_buf(),
            ..InstallerSettings::default()
        };
        let state = AppState::with_settings(dir.path().to_path_buf(), settings, reqwest::Client::new());
        assert_eq!(state.install_dir(), elsewhere.path());
    }

    #[test]
    fn installed_needs_marker_and_directory() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(dir.path());
        assert!(!state.is_installed());

        std::fs::write(dir.path().join(".build"), "1.0").unwrap();
        assert!(!state.is_installed());

        std::fs::create_dir_all(state.install_dir()).unwrap();
        assert!(state.is_installed());
    }

    #[test]
    fn title_shows_build() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            state(dir.path()).window_title("2024.11.02"),
            "Lithicsoft AI Studio Installer | Build: 2024.11.02"
        );
    }
}
