// Kiosk guard platform abstraction
// Platform-specific locations of the settings file and the policy database.

use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

/// Directory holding `settings.json`.
///
/// - **Linux**: `~/.config/kiosk-guard` (or `$XDG_CONFIG_HOME/kiosk-guard`)
/// - **macOS**: `~/Library/Application Support/kiosk-guard`
/// - **Windows**: `%APPDATA%/kiosk-guard`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_config_dir()
    }
    #[cfg(not(target_os = "linux"))]
    {
        app_support_dir()
    }
}

/// Directory holding the policy database.
///
/// - **Linux**: `~/.local/share/kiosk-guard` (or `$XDG_DATA_HOME/kiosk-guard`)
/// - **macOS** and **Windows**: same as the config directory
pub fn get_data_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_data_dir()
    }
    #[cfg(not(target_os = "linux"))]
    {
        app_support_dir()
    }
}

#[cfg(target_os = "macos")]
fn app_support_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
    PathBuf::from(home)
        .join("Library")
        .join("Application Support")
        .join("kiosk-guard")
}

#[cfg(all(not(target_os = "linux"), not(target_os = "macos")))]
fn app_support_dir() -> PathBuf {
    let appdata = std::env::var("APPDATA")
        .unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
    PathBuf::from(appdata).join("kiosk-guard")
}
