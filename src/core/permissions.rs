use std::path::Path;

use tracing::info;

use crate::core::error::{InstallerError, InstallerResult};

/// Give local users full control over the install directory so the app can
/// write next to its own files without elevation. Blocking.
#[cfg(target_os = "windows")]
pub fn grant_full_control(dir: &Path) -> InstallerResult<()> {
    use std::os::windows::process::CommandExt;
    use std::process::Command;

    const CREATE_NO_WINDOW: u32 = 0x0800_0000;
    // Well-known SID of BUILTIN\Users; the group name is localized.
    const USERS_FULL_CONTROL: &str = "*S-1-5-32-545:(OI)(CI)F";

    let output = Command::new("icacls")
        .arg(dir)
        .args(["/grant", USERS_FULL_CONTROL, "/T", "/C", "/Q"])
        .creation_flags(CREATE_NO_WINDOW)
        .output()
        .map_err(InstallerError::io(dir))?;

    if !output.status.success() {
        return Err(InstallerError::Permissions {
            path: dir.to_path_buf(),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    info!("Granted full control on {:?}", dir);
    Ok(())
}

/// Owner gets `rwx` on every directory and `rw` on every file; existing
/// execute bits are kept. Blocking.
#[cfg(unix)]
pub fn grant_full_control(dir: &Path) -> InstallerResult<()> {
    if !dir.is_dir() {
        return Err(InstallerError::Permissions {
            path: dir.to_path_buf(),
            message: "not a directory".into(),
        });
    }
    let touched = grant_recursive(dir)?;
    info!("Granted owner full control on {:?} ({} entries)", dir, touched);
    Ok(())
}

#[cfg(unix)]
fn add_mode_bits(path: &Path, bits: u32) -> InstallerResult<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = std::fs::metadata(path)
        .map_err(InstallerError::io(path))?
        .permissions();
    let mode = perms.mode();
    if mode & bits != bits {
        perms.set_mode(mode | bits);
        std::fs::set_permissions(path, perms).map_err(InstallerError::io(path))?;
    }
    Ok(())
}

#[cfg(unix)]
fn grant_recursive(dir: &Path) -> InstallerResult<usize> {
    add_mode_bits(dir, 0o700)?;
    let mut touched = 1;

    for entry in std::fs::read_dir(dir).map_err(InstallerError::io(dir))? {
        let entry = entry.map_err(InstallerError::io(dir))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(InstallerError::io(&path))?;

        if file_type.is_dir() {
            touched += grant_recursive(&path)?;
        } else if file_type.is_file() {
            add_mode_bits(&path, 0o600)?;
            touched += 1;
        }
    }

    Ok(touched)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn mode(path: &Path) -> u32 {
        std::fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[test]
    fn restores_owner_access_and_keeps_exec_bits() {
        let scratch = tempfile::tempdir().unwrap();
        let root = scratch.path().join("install");
        let nested = root.join("bin");
        std::fs::create_dir_all(&nested).unwrap();

        let exe = nested.join("studio");
        let doc = root.join("readme.txt");
        std::fs::write(&exe, "#!/bin/sh\n").unwrap();
        std::fs::write(&doc, "hi").unwrap();
        std::fs::set_permissions(&exe, std::fs::Permissions::from_mode(0o555)).unwrap();
        std::fs::set_permissions(&doc, std::fs::Permissions::from_mode(0o400)).unwrap();
        std::fs::set_permissions(&nested, std::fs::Permissions::from_mode(0o500)).unwrap();

        grant_full_control(&root).unwrap();

        assert_eq!(mode(&nested) & 0o700, 0o700);
        assert_eq!(mode(&exe), 0o755);
        assert_eq!(mode(&doc), 0o600);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let scratch = tempfile::tempdir().unwrap();
        let err = grant_full_control(&scratch.path().join("nope")).unwrap_err();
        assert!(matches!(err, InstallerError::Permissions { .. }));
    }
}
