//! WebSocket client for the configuration server.
//!
//! On every connection the client asks for the current configuration and
//! then forwards every pushed snapshot to the engine loop. When the socket
//! drops it reconnects after a fixed delay, forever.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::types::errors::PolicySourceError;
use crate::types::messages::{ConfigSourceMessage, ON_GET_CLIENT_CONFIG};

/// Extract a policy snapshot from a server message, if it carries one.
pub fn parse_policy_message(text: &str) -> Result<Option<serde_json::Value>, PolicySourceError> {
    let message: ConfigSourceMessage =
        serde_json::from_str(text).map_err(|e| PolicySourceError::Protocol(e.to_string()))?;
    if message.event == ON_GET_CLIENT_CONFIG {
        Ok(Some(message.data))
    } else {
        Ok(None)
    }
}

/// The request sent right after connecting.
pub fn config_request() -> String {
    serde_json::to_string(&ConfigSourceMessage::config_request())
        .unwrap_or_else(|_| r#"{"event":"getClientConfig","data":{}}"#.to_string())
}

/// Run one connection until it closes. Returns `Ok` on a clean close.
pub async fn run_once(
    url: &str,
    policies: &mpsc::Sender<serde_json::Value>,
) -> Result<(), PolicySourceError> {
    let (mut ws, _) = connect_async(url)
        .await
        .map_err(|e| PolicySourceError::Connection(e.to_string()))?;
    info!(url, "connected to configuration server");

    ws.send(Message::Text(config_request().into()))
        .await
        .map_err(|e| PolicySourceError::Connection(e.to_string()))?;

    while let Some(frame) = ws.next().await {
        let frame = frame.map_err(|e| PolicySourceError::Connection(e.to_string()))?;
        match frame {
            Message::Text(text) => match parse_policy_message(text.as_str()) {
                Ok(Some(policy)) => {
                    if policies.send(policy).await.is_err() {
                        // Engine loop is gone; nothing left to deliver to.
                        let _ = ws.close(None).await;
                        return Ok(());
                    }
                }
                Ok(None) => debug!("ignoring configuration server event"),
                Err(e) => warn!(error = %e, "ignoring configuration server message"),
            },
            Message::Close(_) => break,
            _ => {}
        }
    }
    Ok(())
}

/// Keep a connection to the configuration server alive, forwarding snapshots.
pub async fn run(url: String, reconnect_delay: Duration, policies: mpsc::Sender<serde_json::Value>) {
    loop {
        match run_once(&url, &policies).await {
            Ok(()) => info!("configuration server closed the connection"),
            Err(e) => warn!(error = %e, "configuration server unavailable"),
        }
        if policies.is_closed() {
            return;
        }
        tokio::time::sleep(reconnect_delay).await;
    }
}
