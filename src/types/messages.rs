use serde::{Deserialize, Serialize};

use super::navigation::NavigationEvent;
use super::policy::Policy;

/// Messages delivered to the content layer of a tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum TabMessage {
    /// Replace the frame that attempted this navigation with the blocked placeholder.
    BlockFrame(NavigationEvent),
    ScreenSaver { show: bool },
    /// New policy for the in-page UI (nav bar, keyboard, screensaver).
    AppConfig(Box<Policy>),
}

/// A desktop notification shown to the kiosk user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn blocked_url(url: &str) -> Self {
        Self {
            title: "Blocked URL".to_string(),
            message: url.to_string(),
        }
    }

    pub fn configuration_updated() -> Self {
        Self {
            title: "Configuration updated".to_string(),
            message: "Configuration has been updated".to_string(),
        }
    }
}

/// Envelope exchanged with the configuration server over the WebSocket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSourceMessage {
    pub event: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Event name of the request for the current client configuration.
pub const GET_CLIENT_CONFIG: &str = "getClientConfig";

/// Event name of a configuration push from the server.
pub const ON_GET_CLIENT_CONFIG: &str = "onGetClientConfig";

impl ConfigSourceMessage {
    pub fn config_request() -> Self {
        Self {
            event: GET_CLIENT_CONFIG.to_string(),
            data: serde_json::json!({}),
        }
    }
}
