//! Browser bridge over newline-delimited JSON.
//!
//! A small extension shim inside the browser forwards navigation, tab and idle
//! events to the guard and executes the guard's calls. One JSON object per line.
//!
//! Events (shim -> guard):
//! `{"event":"beforeNavigate","data":{"tabId":3,"frameId":0,"url":"..."}}`
//!
//! Calls (guard -> shim) and their answers:
//! `{"id":1,"method":"tabs.update","params":{"tabId":3,"url":"..."}}`
//! `{"id":1,"result":null}` or `{"id":1,"error":"No tab with id: 3."}`

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use super::Browser;
use crate::types::errors::{BridgeError, BrowserOpError};
use crate::types::messages::{Notification, TabMessage};
use crate::types::navigation::{BrowserEvent, OpenTab, TabId};

type CallOutcome = Result<Value, String>;

/// A parsed inbound line.
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeInbound {
    Event(BrowserEvent),
    Response { id: u64, outcome: CallOutcome },
}

/// Parse one line received from the browser shim.
pub fn parse_line(line: &str) -> Result<BridgeInbound, BridgeError> {
    let value: Value =
        serde_json::from_str(line).map_err(|e| BridgeError::Parse(e.to_string()))?;

    if value.get("event").is_some() {
        let event: BrowserEvent = serde_json::from_value(value)
            .map_err(|e| BridgeError::UnknownMessage(e.to_string()))?;
        return Ok(BridgeInbound::Event(event));
    }

    if let Some(id) = value.get("id").and_then(Value::as_u64) {
        let outcome = match value.get("error") {
            Some(Value::String(msg)) => Err(msg.clone()),
            Some(Value::Null) | None => Ok(value.get("result").cloned().unwrap_or(Value::Null)),
            Some(other) => Err(other.to_string()),
        };
        return Ok(BridgeInbound::Response { id, outcome });
    }

    Err(BridgeError::UnknownMessage(line.chars().take(200).collect()))
}

/// Map an error string reported by the browser to a typed error.
pub fn map_browser_error(message: &str) -> BrowserOpError {
    const NO_TAB: &str = "No tab with id:";
    if let Some(pos) = message.find(NO_TAB) {
        let rest = message[pos + NO_TAB.len()..].trim_start();
        let digits: String = rest
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '-')
            .collect();
        if let Ok(tab_id) = digits.parse::<TabId>() {
            return BrowserOpError::TabNotFound(tab_id);
        }
    }
    BrowserOpError::Failed(message.to_string())
}

/// Calls waiting for their answer, shared between the browser handle and the
/// reader task that receives the answers.
#[derive(Clone, Default)]
pub struct PendingCalls {
    inner: Arc<Mutex<HashMap<u64, oneshot::Sender<CallOutcome>>>>,
}

impl PendingCalls {
    fn lock(&self) -> MutexGuard<'_, HashMap<u64, oneshot::Sender<CallOutcome>>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn register(&self, id: u64) -> oneshot::Receiver<CallOutcome> {
        let (tx, rx) = oneshot::channel();
        self.lock().insert(id, tx);
        rx
    }

    fn forget(&self, id: u64) {
        self.lock().remove(&id);
    }

    /// Deliver an answer. Returns `false` for unknown or abandoned call IDs.
    pub fn resolve(&self, id: u64, outcome: CallOutcome) -> bool {
        match self.lock().remove(&id) {
            Some(tx) => tx.send(outcome).is_ok(),
            None => false,
        }
    }

    /// Drop every waiting call; their callers see the bridge as disconnected.
    pub fn fail_all(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// [`Browser`] implementation that talks to the shim through line channels.
pub struct BridgeBrowser {
    outbound: mpsc::UnboundedSender<String>,
    pending: PendingCalls,
    next_id: AtomicU64,
    timeout: Duration,
}

impl BridgeBrowser {
    pub fn new(outbound: mpsc::UnboundedSender<String>, timeout: Duration) -> Self {
        Self {
            outbound,
            pending: PendingCalls::default(),
            next_id: AtomicU64::new(1),
            timeout,
        }
    }

    /// Handle for the reader task to deliver answers.
    pub fn pending_calls(&self) -> PendingCalls {
        self.pending.clone()
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, BrowserOpError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let rx = self.pending.register(id);
        let line = json!({"id": id, "method": method, "params": params}).to_string();
        if self.outbound.send(line).is_err() {
            self.pending.forget(id);
            return Err(BrowserOpError::Disconnected);
        }

        match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(Ok(value))) => Ok(value),
            Ok(Ok(Err(message))) => Err(map_browser_error(&message)),
            Ok(Err(_)) => Err(BrowserOpError::Disconnected),
            Err(_) => {
                self.pending.forget(id);
                Err(BrowserOpError::Timeout(method.to_string()))
            }
        }
    }
}

#[async_trait]
impl Browser for BridgeBrowser {
    async fn list_open_tabs(&self) -> Result<Vec<OpenTab>, BrowserOpError> {
        let value = self.call("tabs.query", json!({})).await?;
        serde_json::from_value(value)
            .map_err(|e| BrowserOpError::Failed(format!("invalid tabs.query result: {}", e)))
    }

    async fn update_tab(&self, tab_id: TabId, url: &str) -> Result<(), BrowserOpError> {
        self.call("tabs.update", json!({"tabId": tab_id, "url": url}))
            .await
            .map(|_| ())
    }

    async fn close_tab(&self, tab_id: TabId) -> Result<(), BrowserOpError> {
        self.call("tabs.remove", json!({"tabId": tab_id}))
            .await
            .map(|_| ())
    }

    async fn create_tab(&self, url: &str, active: bool) -> Result<OpenTab, BrowserOpError> {
        let value = self
            .call("tabs.create", json!({"url": url, "active": active}))
            .await?;
        serde_json::from_value(value)
            .map_err(|e| BrowserOpError::Failed(format!("invalid tabs.create result: {}", e)))
    }

    async fn send_to_tab(
        &self,
        tab_id: TabId,
        message: &TabMessage,
    ) -> Result<(), BrowserOpError> {
        self.call(
            "tabs.sendMessage",
            json!({"tabId": tab_id, "message": message}),
        )
        .await
        .map(|_| ())
    }

    async fn show_notification(&self, notification: &Notification) -> Result<(), BrowserOpError> {
        self.call("notifications.create", json!(notification))
            .await
            .map(|_| ())
    }

    async fn set_idle_detection_interval(&self, seconds: u64) -> Result<(), BrowserOpError> {
        self.call("idle.setDetectionInterval", json!({"seconds": seconds}))
            .await
            .map(|_| ())
    }
}

/// Read lines from the shim until EOF. Answers are routed to their waiting
/// calls right here, events are forwarded to the engine loop.
///
/// The events channel is unbounded: the engine loop may itself be waiting on
/// an answer this task has yet to read, so forwarding an event must never
/// block. Lines that are not UTF-8 or not a known message are logged and
/// skipped.
pub async fn run_reader<R>(
    mut reader: R,
    pending: PendingCalls,
    events: mpsc::UnboundedSender<BrowserEvent>,
) where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "browser bridge read failed");
                break;
            }
        }
        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line.trim(),
            Err(e) => {
                warn!(error = %e, "ignoring bridge line that is not UTF-8");
                continue;
            }
        };
        if line.is_empty() {
            continue;
        }
        match parse_line(line) {
            Ok(BridgeInbound::Event(event)) => {
                if events.send(event).is_err() {
                    break;
                }
            }
            Ok(BridgeInbound::Response { id, outcome }) => {
                if !pending.resolve(id, outcome) {
                    debug!(id, "answer for unknown or expired call");
                }
            }
            Err(e) => warn!(error = %e, "ignoring bridge line"),
        }
    }
    pending.fail_all();
}

/// Write outbound lines to the shim, one per line, flushing after each.
pub async fn run_writer<W>(mut outbound: mpsc::UnboundedReceiver<String>, mut writer: W)
where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = outbound.recv().await {
        let written = async {
            writer.write_all(line.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await
        }
        .await;
        if let Err(e) = written {
            warn!(error = %e, "browser bridge write failed");
            break;
        }
    }
}
