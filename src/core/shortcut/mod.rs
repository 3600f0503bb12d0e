//! Desktop and start-menu shortcuts to the installed executable.
//!
//! - Windows: `.lnk` files written through the `WScript.Shell` COM object.
//! - Elsewhere: XDG desktop entries (`.desktop`).

mod desktop_entry;
mod manager;
#[cfg(target_os = "windows")]
mod windows;

pub use desktop_entry::desktop_entry;
pub use manager::{create_shortcuts, default_locations, ShortcutLocations, ShortcutSpec};
