use std::path::{Path, PathBuf};

use tracing::info;

use crate::core::error::{InstallerError, InstallerResult};

#[cfg(target_os = "windows")]
const SHORTCUT_EXTENSION: &str = "lnk";
#[cfg(not(target_os = "windows"))]
const SHORTCUT_EXTENSION: &str = "desktop";

/// What a shortcut points at.
#[derive(Debug, Clone)]
pub struct ShortcutSpec {
    pub name: String,
    pub description: String,
    pub target: PathBuf,
    pub working_dir: PathBuf,
}

impl ShortcutSpec {
    /// Shortcut to `target`, started from the directory containing it.
    pub fn for_executable(name: &str, target: PathBuf) -> Self {
        let working_dir = target
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            name: name.to_string(),
            description: format!("Shortcut for {name}"),
            target,
            working_dir,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name, SHORTCUT_EXTENSION)
    }
}

/// Folders the two shortcuts are written into.
#[derive(Debug, Clone)]
pub struct ShortcutLocations {
    pub desktop: PathBuf,
    pub start_menu: PathBuf,
}

pub fn default_locations() -> InstallerResult<ShortcutLocations> {
    let desktop = dirs::desktop_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Desktop")))
        .ok_or_else(|| InstallerError::Shortcut("desktop folder not found".into()))?;

    let data_dir = dirs::data_dir()
        .ok_or_else(|| InstallerError::Shortcut("application data folder not found".into()))?;

    let start_menu = if cfg!(target_os = "windows") {
        data_dir.join("Microsoft").join("Windows").join("Start Menu")
    } else {
        data_dir.join("applications")
    };

    Ok(ShortcutLocations {
        desktop,
        start_menu,
    })
}

/// Create the desktop and start-menu shortcuts, replacing old ones.
/// Returns the written paths, desktop first. Blocking.
pub fn create_shortcuts(
    spec: &ShortcutSpec,
    locations: &ShortcutLocations,
) -> InstallerResult<Vec<PathBuf>> {
    let mut created = Vec::with_capacity(2);
    for folder in [&locations.desktop, &locations.start_menu] {
        std::fs::create_dir_all(folder).map_err(InstallerError::io(folder))?;
        let link_path = folder.join(spec.file_name());
        write_shortcut(spec, &link_path)?;
        info!("Created shortcut {:?} -> {:?}", link_path, spec.target);
        created.push(link_path);
    }
    Ok(created)
}

#[cfg(target_os = "windows")]
fn write_shortcut(spec: &ShortcutSpec, link_path: &Path) -> InstallerResult<()> {
    super::windows::write_lnk(spec, link_path)
}

#[cfg(not(target_os = "windows"))]
fn write_shortcut(spec: &ShortcutSpec, link_path: &Path) -> InstallerResult<()> {
    std::fs::write(link_path, super::desktop_entry(spec)).map_err(InstallerError::io(link_path))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(link_path)
            .map_err(InstallerError::io(link_path))?
            .permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(link_path, perms).map_err(InstallerError::io(link_path))?;
    }

    Ok(())
}
