// ─── Install Task ───
// Check → fetch → extract → finalize. Runs on a background task and talks to
// the display only through `EventSender`.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::core::archive::{self, ExtractSummary};
use crate::core::error::{InstallerError, InstallerResult};
use crate::core::events::EventSender;
use crate::core::permissions;
use crate::core::progress::ProgressReporter;
use crate::core::shortcut::{self, ShortcutSpec};
use crate::core::state::AppState;
use crate::core::version::{ControlAction, RemoteManifest, UpdateStatus};

/// Error boundaries of the workflow. Each one reports on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Initialization,
    Check,
    Download,
    Extraction,
    Shortcut,
    Changelog,
}

impl Stage {
    pub fn error_context(self) -> &'static str {
        match self {
            Stage::Initialization => "Error during initialization",
            Stage::Check => "Error checking for updates",
            Stage::Download => "Error during download",
            Stage::Extraction => "Error during extraction",
            Stage::Shortcut => "Error creating shortcut",
            Stage::Changelog => "Error loading page",
        }
    }
}

#[derive(Debug, Error)]
#[error("{}: {source}", .stage.error_context())]
pub struct StageError {
    pub stage: Stage,
    #[source]
    pub source: InstallerError,
}

trait AtStage<T> {
    fn at(self, stage: Stage) -> Result<T, StageError>;
}

impl<T> AtStage<T> for InstallerResult<T> {
    fn at(self, stage: Stage) -> Result<T, StageError> {
        self.map_err(|source| StageError { stage, source })
    }
}

/// What a successful run did.
#[derive(Debug, Clone)]
pub struct InstallOutcome {
    pub build: String,
    pub fresh_install: bool,
    pub extracted: ExtractSummary,
    pub shortcuts: Vec<PathBuf>,
}

/// Compare the remote manifest with the local marker and tell the user.
pub async fn check_for_updates(
    state: &AppState,
    events: &EventSender,
) -> InstallerResult<UpdateStatus> {
    let manifest = RemoteManifest::fetch(&state.http_client, &state.settings.manifest_url).await?;
    let installed = state.marker.read().await?;
    let status = UpdateStatus::compare(&manifest.latest_build, installed.as_deref());

    if status.is_up_to_date() {
        events.notify(
            "Up-to-Date",
            format!("{} is already up-to-date.", state.settings.app_name),
        );
    } else {
        events.notify(
            "Update Available",
            "An update is available. Please update to the new version.",
        );
    }

    info!("Update check: {:?}", status);
    Ok(status)
}

/// Start-up: show the installed build and pick the control label.
pub async fn initial_action(state: &AppState, events: &EventSender) -> ControlAction {
    if !state.is_installed() {
        return ControlAction::Install;
    }

    match state.marker.read().await {
        Ok(Some(build)) => events.title(state.window_title(&build)),
        Ok(None) => {}
        Err(e) => report(events, &StageError {
            stage: Stage::Initialization,
            source: e,
        }),
    }

    match check_for_updates(state, events).await {
        Ok(status) => ControlAction::for_state(true, status),
        Err(source) => {
            report(events, &StageError {
                stage: Stage::Check,
                source,
            });
            ControlAction::Update
        }
    }
}

/// The control action. Install, Update and Repair all land here.
///
/// The marker is written only after extraction succeeds, so a failed run
/// leaves it naming the previous good build.
pub async fn run_install(
    state: Arc<AppState>,
    events: EventSender,
) -> Result<InstallOutcome, StageError> {
    let fresh_install = !state.is_installed();
    let reporter = ProgressReporter::new(events.clone());
    let archive_path = state.archive_path();
    let install_dir = state.install_dir();

    // ── Fetch ──
    let manifest = RemoteManifest::fetch(&state.http_client, &state.settings.manifest_url)
        .await
        .at(Stage::Download)?;
    let url = manifest.require_download_url().at(Stage::Download)?;
    state
        .downloader
        .download_archive(url, &archive_path, &reporter)
        .await
        .at(Stage::Download)?;

    // ── Extract ──
    let extracted = {
        let zip_path = archive_path.clone();
        let destination = install_dir.clone();
        let reporter = reporter.clone();
        tokio::task::spawn_blocking(move || {
            archive::extract_archive(&zip_path, &destination, &reporter)
        })
        .await
        .map_err(InstallerError::from)
        .and_then(|result| result)
        .at(Stage::Extraction)?
    };

    // ── Finalize ──
    tokio::fs::remove_file(&archive_path)
        .await
        .map_err(InstallerError::io(&archive_path))
        .at(Stage::Extraction)?;

    let permissions_dir = install_dir.clone();
    tokio::task::spawn_blocking(move || permissions::grant_full_control(&permissions_dir))
        .await
        .map_err(InstallerError::from)
        .and_then(|result| result)
        .at(Stage::Extraction)?;

    let shortcuts = match create_shortcuts(&state).await {
        Ok(paths) => paths,
        Err(source) => {
            report(&events, &StageError {
                stage: Stage::Shortcut,
                source,
            });
            Vec::new()
        }
    };

    state
        .marker
        .write(&manifest.latest_build)
        .await
        .at(Stage::Extraction)?;

    let app = &state.settings.app_name;
    if fresh_install {
        events.notify("Installation Complete", format!("{app} has been installed!"));
    } else {
        events.notify("Update Complete", format!("{app} has been updated!"));
    }
    events.info("Waiting ...");
    events.title(state.window_title(&manifest.latest_build));
    events.action(ControlAction::Repair);

    info!(
        "{} build {} ({} files)",
        if fresh_install { "Installed" } else { "Updated" },
        manifest.latest_build,
        extracted.files
    );

    Ok(InstallOutcome {
        build: manifest.latest_build,
        fresh_install,
        extracted,
        shortcuts,
    })
}

async fn create_shortcuts(state: &AppState) -> InstallerResult<Vec<PathBuf>> {
    let locations = state.shortcut_locations()?;
    let spec = ShortcutSpec::for_executable(&state.settings.app_name, state.executable_path());
    if !spec.target.exists() {
        warn!("Shortcut target {:?} is not in the archive", spec.target);
    }
    tokio::task::spawn_blocking(move || shortcut::create_shortcuts(&spec, &locations)).await?
}

/// Surface a stage failure: short message to the display, full chain to the log.
pub fn report(events: &EventSender, error: &StageError) {
    tracing::error!("{}: {:?}", error.stage.error_context(), error.source);
    events.error(error.stage.error_context(), &error.source);
}
