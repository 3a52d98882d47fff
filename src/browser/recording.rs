//! In-memory browser that applies commands to a simulated tab strip and
//! records every call. Backs the demo binary and the integration tests.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::Browser;
use crate::types::errors::BrowserOpError;
use crate::types::messages::{Notification, TabMessage};
use crate::types::navigation::{OpenTab, TabId};

/// One call made by the engine, in the order it was made.
#[derive(Debug, Clone, PartialEq)]
pub enum BrowserCommand {
    Update { tab_id: TabId, url: String },
    Close { tab_id: TabId },
    Create { tab_id: TabId, url: String, active: bool },
    Send { tab_id: TabId, message: TabMessage },
    Notify(Notification),
    SetIdleInterval(u64),
}

#[derive(Default)]
struct State {
    tabs: BTreeMap<TabId, OpenTab>,
    next_id: TabId,
    commands: Vec<BrowserCommand>,
}

/// Simulated browser.
#[derive(Default)]
pub struct RecordingBrowser {
    state: Mutex<State>,
}

impl RecordingBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panic while holding the lock leaves plain data behind; keep going.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Open a tab as if the user did it. Returns the new tab ID.
    pub fn open_tab(&self, url: &str) -> TabId {
        let mut state = self.lock();
        state.next_id += 1;
        let tab_id = state.next_id;
        state.tabs.insert(
            tab_id,
            OpenTab {
                tab_id,
                url: url.to_string(),
                active: false,
            },
        );
        tab_id
    }

    /// Close a tab behind the engine's back.
    pub fn drop_tab(&self, tab_id: TabId) {
        self.lock().tabs.remove(&tab_id);
    }

    pub fn tabs(&self) -> Vec<OpenTab> {
        self.lock().tabs.values().cloned().collect()
    }

    pub fn tab_url(&self, tab_id: TabId) -> Option<String> {
        self.lock().tabs.get(&tab_id).map(|t| t.url.clone())
    }

    pub fn commands(&self) -> Vec<BrowserCommand> {
        self.lock().commands.clone()
    }

    /// Return and forget the recorded commands.
    pub fn take_commands(&self) -> Vec<BrowserCommand> {
        std::mem::take(&mut self.lock().commands)
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.lock()
            .commands
            .iter()
            .filter_map(|c| match c {
                BrowserCommand::Notify(n) => Some(n.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn messages_for(&self, tab_id: TabId) -> Vec<TabMessage> {
        self.lock()
            .commands
            .iter()
            .filter_map(|c| match c {
                BrowserCommand::Send { tab_id: id, message } if *id == tab_id => {
                    Some(message.clone())
                }
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Browser for RecordingBrowser {
    async fn list_open_tabs(&self) -> Result<Vec<OpenTab>, BrowserOpError> {
        Ok(self.tabs())
    }

    async fn update_tab(&self, tab_id: TabId, url: &str) -> Result<(), BrowserOpError> {
        let mut state = self.lock();
        state.commands.push(BrowserCommand::Update {
            tab_id,
            url: url.to_string(),
        });
        let tab = state
            .tabs
            .get_mut(&tab_id)
            .ok_or(BrowserOpError::TabNotFound(tab_id))?;
        tab.url = url.to_string();
        Ok(())
    }

    async fn close_tab(&self, tab_id: TabId) -> Result<(), BrowserOpError> {
        let mut state = self.lock();
        state.commands.push(BrowserCommand::Close { tab_id });
        state
            .tabs
            .remove(&tab_id)
            .map(|_| ())
            .ok_or(BrowserOpError::TabNotFound(tab_id))
    }

    async fn create_tab(&self, url: &str, active: bool) -> Result<OpenTab, BrowserOpError> {
        let mut state = self.lock();
        state.next_id += 1;
        let tab_id = state.next_id;
        if active {
            for tab in state.tabs.values_mut() {
                tab.active = false;
            }
        }
        let tab = OpenTab {
            tab_id,
            url: url.to_string(),
            active,
        };
        state.tabs.insert(tab_id, tab.clone());
        state.commands.push(BrowserCommand::Create {
            tab_id,
            url: url.to_string(),
            active,
        });
        Ok(tab)
    }

    async fn send_to_tab(
        &self,
        tab_id: TabId,
        message: &TabMessage,
    ) -> Result<(), BrowserOpError> {
        let mut state = self.lock();
        if !state.tabs.contains_key(&tab_id) {
            return Err(BrowserOpError::TabNotFound(tab_id));
        }
        state.commands.push(BrowserCommand::Send {
            tab_id,
            message: message.clone(),
        });
        Ok(())
    }

    async fn show_notification(&self, notification: &Notification) -> Result<(), BrowserOpError> {
        self.lock()
            .commands
            .push(BrowserCommand::Notify(notification.clone()));
        Ok(())
    }

    async fn set_idle_detection_interval(&self, seconds: u64) -> Result<(), BrowserOpError> {
        self.lock()
            .commands
            .push(BrowserCommand::SetIdleInterval(seconds));
        Ok(())
    }
}
