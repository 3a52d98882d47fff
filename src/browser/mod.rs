//! Browser collaborator interface.
//!
//! The engine never touches the browser directly; every tab action goes
//! through [`Browser`], whose operations are asynchronous and may fail with a
//! transient [`BrowserOpError`] when the target has disappeared.

pub mod recording;
pub mod stdio_bridge;

use async_trait::async_trait;

use crate::types::errors::BrowserOpError;
use crate::types::messages::{Notification, TabMessage};
use crate::types::navigation::{OpenTab, TabId};

/// Outbound operations the engine performs on the browser.
#[async_trait]
pub trait Browser: Send + Sync {
    async fn list_open_tabs(&self) -> Result<Vec<OpenTab>, BrowserOpError>;
    async fn update_tab(&self, tab_id: TabId, url: &str) -> Result<(), BrowserOpError>;
    async fn close_tab(&self, tab_id: TabId) -> Result<(), BrowserOpError>;
    async fn create_tab(&self, url: &str, active: bool) -> Result<OpenTab, BrowserOpError>;
    async fn send_to_tab(&self, tab_id: TabId, message: &TabMessage)
        -> Result<(), BrowserOpError>;
    async fn show_notification(&self, notification: &Notification) -> Result<(), BrowserOpError>;
    /// Configure how long the user must be inactive before `idle` is reported.
    async fn set_idle_detection_interval(&self, seconds: u64) -> Result<(), BrowserOpError>;
}
