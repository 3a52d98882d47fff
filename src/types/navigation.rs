use serde::{Deserialize, Serialize};

use super::idle::IdleState;

/// Browser-assigned tab identifier. Reused only after the tab is closed.
pub type TabId = i64;

/// Frame identifier inside a tab. `0` is the top-level document.
pub type FrameId = i64;

/// Frame ID of the top-level document of a tab.
pub const MAIN_FRAME: FrameId = 0;

/// URL that every new tab and nested frame starts on.
pub const ABOUT_BLANK: &str = "about:blank";

/// A navigation reported by the browser for one frame of one tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationEvent {
    pub tab_id: TabId,
    pub frame_id: FrameId,
    pub url: String,
}

impl NavigationEvent {
    pub fn new(tab_id: TabId, frame_id: FrameId, url: impl Into<String>) -> Self {
        Self {
            tab_id,
            frame_id,
            url: url.into(),
        }
    }

    pub fn is_main_frame(&self) -> bool {
        self.frame_id == MAIN_FRAME
    }
}

/// An open tab as reported by the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenTab {
    pub tab_id: TabId,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub active: bool,
}

/// Events delivered by the browser to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum BrowserEvent {
    BeforeNavigate(NavigationEvent),
    NavigationCompleted(NavigationEvent),
    #[serde(rename_all = "camelCase")]
    TabRemoved { tab_id: TabId },
    IdleStateChanged { state: IdleState },
}

/// The action the arbiter decided for a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Remediation {
    /// Nothing to do.
    Allow,
    /// Replace the frame's content with the blocked placeholder.
    BlockFrame(NavigationEvent),
    /// Close a tab that has no known-good page to fall back to.
    CloseTab { tab_id: TabId },
    /// Navigate the tab to `url` and tell the user `blocked_url` was refused.
    RedirectTab {
        tab_id: TabId,
        url: String,
        blocked_url: String,
    },
}

impl Remediation {
    pub fn is_allow(&self) -> bool {
        matches!(self, Remediation::Allow)
    }
}
