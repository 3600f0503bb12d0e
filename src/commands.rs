use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

use crate::core::changelog;
use crate::core::events::EventSender;
use crate::core::install::{self, InstallOutcome, Stage, StageError};
use crate::core::state::AppState;
use crate::core::version::ControlAction;

/// Start-up: pick the control label and show the installed build.
pub async fn load_installer(state: &AppState, events: &EventSender) -> ControlAction {
    let action = install::initial_action(state, events).await;
    info!("Control action: {}", action);
    action
}

pub async fn get_changelog(state: &AppState) -> Result<String, StageError> {
    changelog::fetch_changelog(&state.http_client, &state.settings.changelog_url)
        .await
        .map_err(|source| StageError {
            stage: Stage::Changelog,
            source,
        })
}

/// Run Install / Update / Repair on a background task.
///
/// Stage failures are reported to the display here; the task always ends by
/// sending `Idle` so the control can be used again.
pub fn start_install(
    state: Arc<AppState>,
    events: EventSender,
) -> JoinHandle<Option<InstallOutcome>> {
    tokio::spawn(async move {
        let result = install::run_install(state, events.clone()).await;
        let outcome = match result {
            Ok(outcome) => Some(outcome),
            Err(error) => {
                install::report(&events, &error);
                None
            }
        };
        events.idle();
        outcome
    })
}
