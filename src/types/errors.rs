use std::fmt;

use super::navigation::TabId;

// === BrowserOpError ===

/// Errors returned by a dispatched browser operation.
///
/// These are transient by nature: the target tab may have been closed between
/// the decision and the call. Callers log and discard them.
#[derive(Debug, Clone, PartialEq)]
pub enum BrowserOpError {
    /// The tab with the given ID no longer exists.
    TabNotFound(TabId),
    /// The browser rejected the operation.
    Failed(String),
    /// The browser did not answer in time.
    Timeout(String),
    /// The connection to the browser is gone.
    Disconnected,
}

impl fmt::Display for BrowserOpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowserOpError::TabNotFound(id) => write!(f, "No tab with id: {}", id),
            BrowserOpError::Failed(msg) => write!(f, "Browser operation failed: {}", msg),
            BrowserOpError::Timeout(method) => write!(f, "Browser call timed out: {}", method),
            BrowserOpError::Disconnected => write!(f, "Browser bridge disconnected"),
        }
    }
}

impl std::error::Error for BrowserOpError {}

// === PolicyError ===

/// Errors raised while accepting an incoming policy snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum PolicyError {
    /// The snapshot is missing required fields or has the wrong shape.
    Malformed(String),
    /// The snapshot parsed but carries an unusable value.
    Invalid(String),
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyError::Malformed(msg) => write!(f, "Malformed policy: {}", msg),
            PolicyError::Invalid(msg) => write!(f, "Invalid policy: {}", msg),
        }
    }
}

impl std::error::Error for PolicyError {}

// === StorageError ===

/// Errors related to persisting the last applied policy.
#[derive(Debug)]
pub enum StorageError {
    /// Database operation failed.
    DatabaseError(String),
    /// The stored payload could not be (de)serialized.
    SerializationError(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::DatabaseError(msg) => write!(f, "Policy storage database error: {}", msg),
            StorageError::SerializationError(msg) => {
                write!(f, "Policy storage serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for StorageError {}

// === SettingsError ===

/// Errors related to daemon settings operations.
#[derive(Debug)]
pub enum SettingsError {
    /// File I/O error.
    IoError(String),
    /// JSON serialization or deserialization error.
    SerializationError(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}

// === BridgeError ===

/// Errors related to the newline-delimited JSON browser bridge.
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeError {
    /// The line is not valid JSON.
    Parse(String),
    /// The line is JSON but neither a known event nor a call response.
    UnknownMessage(String),
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::Parse(msg) => write!(f, "Bridge parse error: {}", msg),
            BridgeError::UnknownMessage(msg) => write!(f, "Unknown bridge message: {}", msg),
        }
    }
}

impl std::error::Error for BridgeError {}

// === PolicySourceError ===

/// Errors related to the WebSocket policy source.
#[derive(Debug)]
pub enum PolicySourceError {
    /// Could not connect to (or lost) the configuration server.
    Connection(String),
    /// The server sent something that is not a policy message.
    Protocol(String),
}

impl fmt::Display for PolicySourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicySourceError::Connection(msg) => {
                write!(f, "Policy source connection error: {}", msg)
            }
            PolicySourceError::Protocol(msg) => write!(f, "Policy source protocol error: {}", msg),
        }
    }
}

impl std::error::Error for PolicySourceError {}
