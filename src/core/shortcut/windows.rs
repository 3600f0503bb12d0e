use std::os::windows::process::CommandExt;
use std::path::Path;
use std::process::Command;

use tracing::debug;

use super::ShortcutSpec;
use crate::core::error::{InstallerError, InstallerResult};

const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Write a `.lnk` through `WScript.Shell`, the same COM object Explorer uses.
pub fn write_lnk(spec: &ShortcutSpec, link_path: &Path) -> InstallerResult<()> {
    let script = lnk_script(spec, link_path);
    debug!("Shortcut script: {}", script);

    let output = Command::new("powershell")
        .args(["-NoProfile", "-NonInteractive", "-Command", &script])
        .creation_flags(CREATE_NO_WINDOW)
        .output()
        .map_err(|source| InstallerError::Io {
            path: link_path.to_path_buf(),
            source,
        })?;

    if !output.status.success() {
        return Err(InstallerError::Shortcut(format!(
            "{:?}: {}",
            link_path,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(())
}

fn lnk_script(spec: &ShortcutSpec, link_path: &Path) -> String {
    format!(
        "$shell = New-Object -ComObject WScript.Shell; \
         $lnk = $shell.CreateShortcut({link}); \
         $lnk.Description = {description}; \
         $lnk.TargetPath = {target}; \
         $lnk.WorkingDirectory = {working}; \
         $lnk.Save()",
        link = ps_quote(&link_path.to_string_lossy()),
        description = ps_quote(&spec.description),
        target = ps_quote(&spec.target.to_string_lossy()),
        working = ps_quote(&spec.working_dir.to_string_lossy()),
    )
}

/// Single-quoted PowerShell literal; the only escape is doubling `'`.
fn ps_quote(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', "''"))
}
