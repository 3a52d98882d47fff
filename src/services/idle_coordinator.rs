//! Idle/Screensaver Coordinator.
//!
//! A small state machine over the host's idle signal. It owns no I/O: each
//! input returns the [`IdleDirective`]s the caller must carry out, and a
//! delayed screensaver is represented as a deadline the event loop polls.
//!
//! Two timeouts are layered. When the policy sets `idleTime`, that interval
//! drives idle detection and an idle fire resets the browser to the home page.
//! A longer screensaver interval then still shows the screensaver once the
//! user has stayed idle for the difference. When only the screensaver
//! interval is set, it drives detection and shows the screensaver directly.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use crate::types::idle::{CoordinatorState, IdleDirective, IdleMode, IdleState};
use crate::types::policy::Policy;

pub struct IdleCoordinator {
    state: CoordinatorState,
    mode: IdleMode,
    screensaver_enabled: bool,
    detection_interval_secs: Option<u64>,
    timeout_uses_screensaver_time: bool,
    pending_screensaver: Option<Instant>,
}

impl IdleCoordinator {
    pub fn new() -> Self {
        Self {
            state: CoordinatorState::Active,
            mode: IdleMode::Disabled,
            screensaver_enabled: false,
            detection_interval_secs: None,
            timeout_uses_screensaver_time: false,
            pending_screensaver: None,
        }
    }

    /// Resolve the idle behaviour for `policy`.
    ///
    /// Returns the detection interval the host must be set to, or `None` when
    /// idle handling is disabled and the previous interval stays in place.
    /// Any scheduled screensaver from the previous policy is dropped.
    pub fn configure(&mut self, policy: &Policy) -> Option<u64> {
        let idle_secs = policy.idle_timeout_secs;
        let screensaver_secs = policy.screen_saver.idle_secs;
        self.screensaver_enabled = policy.screen_saver.enabled;
        self.pending_screensaver = None;

        if idle_secs > 0 {
            let screensaver_delay_secs = (self.screensaver_enabled && screensaver_secs > 0)
                .then(|| screensaver_secs.saturating_sub(idle_secs));
            self.mode = IdleMode::HardReset {
                idle_secs,
                screensaver_delay_secs,
            };
            self.timeout_uses_screensaver_time = false;
            self.detection_interval_secs = Some(idle_secs);
        } else if screensaver_secs > 0 {
            self.mode = IdleMode::ScreenSaver {
                idle_secs: screensaver_secs,
            };
            self.timeout_uses_screensaver_time = true;
            self.detection_interval_secs = Some(screensaver_secs);
        } else {
            self.mode = IdleMode::Disabled;
            return None;
        }

        debug!(mode = ?self.mode, "idle coordinator configured");
        self.detection_interval_secs
    }

    /// Feed a state change from the host.
    pub fn on_state_changed(&mut self, state: IdleState, now: Instant) -> Vec<IdleDirective> {
        match state {
            IdleState::Idle => self.on_idle(now),
            IdleState::Active => self.on_active(),
            IdleState::Locked => Vec::new(),
        }
    }

    fn on_idle(&mut self, now: Instant) -> Vec<IdleDirective> {
        if self.state != CoordinatorState::Active {
            return Vec::new();
        }

        match self.mode {
            IdleMode::Disabled => Vec::new(),
            IdleMode::HardReset {
                screensaver_delay_secs,
                ..
            } => {
                info!("user idle, resetting browser to the home page");
                self.state = CoordinatorState::IdlePendingReset;
                let mut directives = vec![IdleDirective::ResetToHome];
                match screensaver_delay_secs {
                    Some(0) => {
                        self.state = CoordinatorState::IdleShowingScreensaver;
                        directives.push(IdleDirective::ShowScreensaver);
                    }
                    Some(delay) => {
                        self.pending_screensaver = Some(now + Duration::from_secs(delay));
                    }
                    None => {}
                }
                directives
            }
            IdleMode::ScreenSaver { .. } => {
                if !self.screensaver_enabled {
                    return Vec::new();
                }
                info!("user idle, showing screensaver");
                self.state = CoordinatorState::IdleShowingScreensaver;
                vec![IdleDirective::ShowScreensaver]
            }
        }
    }

    fn on_active(&mut self) -> Vec<IdleDirective> {
        self.state = CoordinatorState::Active;
        self.pending_screensaver = None;
        vec![IdleDirective::HideScreensaver]
    }

    /// Fire the delayed screensaver if its deadline has passed.
    pub fn poll_timer(&mut self, now: Instant) -> Vec<IdleDirective> {
        match self.pending_screensaver {
            Some(deadline) if deadline <= now => {
                self.pending_screensaver = None;
                self.state = CoordinatorState::IdleShowingScreensaver;
                info!("user still idle, showing screensaver");
                vec![IdleDirective::ShowScreensaver]
            }
            _ => Vec::new(),
        }
    }

    /// When the event loop must call [`poll_timer`](Self::poll_timer) next.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending_screensaver
    }

    pub fn state(&self) -> CoordinatorState {
        self.state
    }

    pub fn mode(&self) -> IdleMode {
        self.mode
    }

    pub fn detection_interval_secs(&self) -> Option<u64> {
        self.detection_interval_secs
    }

    pub fn timeout_uses_screensaver_time(&self) -> bool {
        self.timeout_uses_screensaver_time
    }
}

impl Default for IdleCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
