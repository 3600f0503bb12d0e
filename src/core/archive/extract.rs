// ─── Archive Extraction ───
// Unpacks the release zip over the install directory, entry by entry.

use std::fs::File;
use std::path::Path;

use tracing::{debug, info};

use crate::core::error::{InstallerError, InstallerResult};
use crate::core::progress::{self, ProgressReporter};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    pub entries: usize,
    pub files: usize,
    pub directories: usize,
}

/// Extract every entry of `zip_path` below `destination`.
///
/// Existing files are overwritten; files not present in the archive are left
/// alone. Progress goes from 50 to 100 proportionally to entries processed.
/// Blocking: call from `spawn_blocking`.
pub fn extract_archive(
    zip_path: &Path,
    destination: &Path,
    reporter: &ProgressReporter,
) -> InstallerResult<ExtractSummary> {
    let zip_file = File::open(zip_path).map_err(InstallerError::io(zip_path))?;
    let mut archive = zip::ZipArchive::new(zip_file)?;

    std::fs::create_dir_all(destination).map_err(InstallerError::io(destination))?;

    let total = archive.len();
    let mut summary = ExtractSummary {
        entries: total,
        ..ExtractSummary::default()
    };
    info!("Extracting {} entries into {:?}", total, destination);

    for index in 0..total {
        let mut zipped = archive.by_index(index)?;
        let name = zipped.name().to_string();

        let relative = zipped
            .enclosed_name()
            .ok_or_else(|| InstallerError::UnsafeArchiveEntry(name.clone()))?;
        let out_path = destination.join(relative);

        if name.ends_with('/') {
            std::fs::create_dir_all(&out_path).map_err(InstallerError::io(&out_path))?;
            summary.directories += 1;
        } else {
            if let Some(parent) = out_path.parent() {
                std::fs::create_dir_all(parent).map_err(InstallerError::io(parent))?;
            }

            // File::create truncates, which is the overwrite.
            let mut out = File::create(&out_path).map_err(InstallerError::io(&out_path))?;
            std::io::copy(&mut zipped, &mut out).map_err(InstallerError::io(&out_path))?;
            summary.files += 1;
        }

        debug!("Extracted {}", name);
        reporter.report(
            progress::extract_percent(index + 1, total),
            format!("Extracting {name}..."),
        );
    }

    if total == 0 {
        reporter.report(progress::EXTRACT_END, "Archive is empty");
    }

    info!(
        "Extraction finished: {} files, {} directories",
        summary.files, summary.directories
    );
    Ok(summary)
}
