// Kiosk guard platform paths for Linux
// Config: $XDG_CONFIG_HOME/kiosk-guard or ~/.config/kiosk-guard
// Data:   $XDG_DATA_HOME/kiosk-guard or ~/.local/share/kiosk-guard

use std::env;
use std::path::PathBuf;

fn home() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Resolve an XDG base directory, falling back to `~/<fallback>`.
fn xdg_dir(var: &str, fallback: &[&str]) -> PathBuf {
    let base = match env::var(var) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => fallback.iter().fold(home(), |path, part| path.join(part)),
    };
    base.join("kiosk-guard")
}

pub fn get_config_dir() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", &[".config"])
}

pub fn get_data_dir() -> PathBuf {
    xdg_dir("XDG_DATA_HOME", &[".local", "share"])
}
