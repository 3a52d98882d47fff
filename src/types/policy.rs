use serde::{Deserialize, Deserializer, Serialize};

use super::errors::PolicyError;

/// Complete kiosk policy snapshot.
///
/// Field names on the wire follow the configuration server's JSON
/// (`homePage`, `idleTime`, `whiteList`, ...). `homePage`, `idleTime` and
/// `whiteList` are required; the UI sections fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    pub home_page: String,
    /// Seconds of inactivity before the browser is reset to the home page. 0 disables.
    #[serde(rename = "idleTime", deserialize_with = "lenient_seconds")]
    pub idle_timeout_secs: u64,
    #[serde(default)]
    pub screen_saver: ScreenSaverConfig,
    pub white_list: WhitelistConfig,
    #[serde(default)]
    pub nav_bar: NavBarConfig,
    #[serde(default)]
    pub virtual_keyboard: VirtualKeyboardConfig,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            home_page: "https://salamek.github.io/chromium-kiosk/".to_string(),
            idle_timeout_secs: 0,
            screen_saver: ScreenSaverConfig::default(),
            white_list: WhitelistConfig::default(),
            nav_bar: NavBarConfig::default(),
            virtual_keyboard: VirtualKeyboardConfig::default(),
        }
    }
}

impl Policy {
    /// Parse a snapshot received from the configuration source.
    pub fn from_json(value: serde_json::Value) -> Result<Self, PolicyError> {
        let policy: Policy =
            serde_json::from_value(value).map_err(|e| PolicyError::Malformed(e.to_string()))?;
        policy.validate()?;
        Ok(policy)
    }

    /// Reject snapshots that parse but cannot be enforced.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.home_page.trim().is_empty() {
            return Err(PolicyError::Invalid("homePage cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// Durations arrive as free-form JSON numbers. Fractions are dropped and
/// anything below one second means "off".
fn lenient_seconds<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let seconds = f64::deserialize(deserializer)?;
    if seconds.is_finite() && seconds > 0.0 {
        Ok(seconds as u64)
    } else {
        Ok(0)
    }
}

/// URL whitelist section.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhitelistConfig {
    pub enabled: bool,
    /// Glob patterns (`*`, `?`) of approved URLs.
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default)]
    pub iframe_enabled: IframePolicy,
}

/// What nested frames may load when their URL is not on the whitelist.
///
/// On the wire this is `true`, `false` or an array of glob patterns.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "IframeSetting", into = "IframeSetting")]
pub enum IframePolicy {
    AllowAll,
    #[default]
    BlockAll,
    AllowMatching(Vec<String>),
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum IframeSetting {
    Flag(bool),
    Patterns(Vec<String>),
}

impl From<IframeSetting> for IframePolicy {
    fn from(setting: IframeSetting) -> Self {
        match setting {
            IframeSetting::Flag(true) => IframePolicy::AllowAll,
            IframeSetting::Flag(false) => IframePolicy::BlockAll,
            IframeSetting::Patterns(patterns) => IframePolicy::AllowMatching(patterns),
        }
    }
}

impl From<IframePolicy> for IframeSetting {
    fn from(policy: IframePolicy) -> Self {
        match policy {
            IframePolicy::AllowAll => IframeSetting::Flag(true),
            IframePolicy::BlockAll => IframeSetting::Flag(false),
            IframePolicy::AllowMatching(patterns) => IframeSetting::Patterns(patterns),
        }
    }
}

/// Screensaver section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScreenSaverConfig {
    pub enabled: bool,
    /// Seconds of inactivity before the screensaver shows.
    #[serde(rename = "idleTime", deserialize_with = "lenient_seconds")]
    pub idle_secs: u64,
    pub text: String,
}

impl Default for ScreenSaverConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            idle_secs: 0,
            text: "Touch me".to_string(),
        }
    }
}

/// Navigation bar section, rendered by the in-page UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavBarConfig {
    pub enabled: bool,
    /// Enabled buttons in display order. Empty means all.
    pub enabled_buttons: Vec<String>,
    pub horizontal_position: String,
    pub vertical_position: String,
    /// Width of the bar in percent. Any JSON number.
    pub width: f64,
}

impl Default for NavBarConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            enabled_buttons: vec![
                "home".to_string(),
                "reload".to_string(),
                "back".to_string(),
                "forward".to_string(),
            ],
            horizontal_position: "center".to_string(),
            vertical_position: "bottom".to_string(),
            width: 100.0,
        }
    }
}

/// On-screen keyboard section.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualKeyboardConfig {
    pub enabled: bool,
}
