use serde::{Deserialize, Serialize};

/// Idle state reported by the host idle-detection facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdleState {
    Idle,
    Active,
    /// Screen locked. The coordinator takes no action on it.
    Locked,
}

/// Where the idle/screensaver state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    Active,
    /// The hard reset to the home page has been performed; waiting for activity.
    IdlePendingReset,
    IdleShowingScreensaver,
}

/// Which behaviour an idle fire triggers under the current policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleMode {
    /// Idle detection is configured but nothing happens on fire.
    Disabled,
    /// Reset to the home page. `screensaver_delay_secs` is how much longer the
    /// user must stay idle before the screensaver also shows.
    HardReset {
        idle_secs: u64,
        screensaver_delay_secs: Option<u64>,
    },
    /// Show the screensaver as soon as idle fires.
    ScreenSaver { idle_secs: u64 },
}

/// Side effects requested by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleDirective {
    ResetToHome,
    ShowScreensaver,
    HideScreensaver,
}
