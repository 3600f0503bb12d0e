// ─── Studio Installer Core ───
// Backend for the install / update / repair workflow.
//
// Architecture:
//   core/
//     version/    — Remote manifest, local version marker, update status
//     downloader/ — Streaming archive download with progress
//     archive/    — Zip extraction into the install directory
//     shortcut/   — Desktop + start-menu shortcuts
//     install/    — The check → fetch → extract → finalize task
//     state/      — Settings and shared application state

pub mod archive;
pub mod changelog;
pub mod downloader;
pub mod error;
pub mod events;
pub mod http;
pub mod install;
pub mod permissions;
pub mod progress;
pub mod shortcut;
pub mod state;
pub mod version;

#[cfg(test)]
pub mod test_support;
