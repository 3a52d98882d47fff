use kiosk_guard::types::errors::*;

// === BrowserOpError Tests ===

#[test]
fn browser_op_error_tab_not_found_matches_browser_wording() {
    let err = BrowserOpError::TabNotFound(42);
    assert_eq!(err.to_string(), "No tab with id: 42");
}

#[test]
fn browser_op_error_display_variants() {
    assert_eq!(
        BrowserOpError::Failed("denied".to_string()).to_string(),
        "Browser operation failed: denied"
    );
    assert_eq!(
        BrowserOpError::Timeout("tabs.update".to_string()).to_string(),
        "Browser call timed out: tabs.update"
    );
    assert_eq!(
        BrowserOpError::Disconnected.to_string(),
        "Browser bridge disconnected"
    );
}

#[test]
fn browser_op_error_implements_error_trait() {
    let err: Box<dyn std::error::Error> = Box::new(BrowserOpError::TabNotFound(1));
    assert!(err.source().is_none());
}

// === PolicyError Tests ===

#[test]
fn policy_error_display_variants() {
    assert_eq!(
        PolicyError::Malformed("missing field `homePage`".to_string()).to_string(),
        "Malformed policy: missing field `homePage`"
    );
    assert_eq!(
        PolicyError::Invalid("homePage cannot be empty".to_string()).to_string(),
        "Invalid policy: homePage cannot be empty"
    );
}

// === StorageError Tests ===

#[test]
fn storage_error_display_variants() {
    assert_eq!(
        StorageError::DatabaseError("locked".to_string()).to_string(),
        "Policy storage database error: locked"
    );
    assert_eq!(
        StorageError::SerializationError("eof".to_string()).to_string(),
        "Policy storage serialization error: eof"
    );
}

// === SettingsError Tests ===

#[test]
fn settings_error_display_variants() {
    assert_eq!(
        SettingsError::IoError("permission denied".to_string()).to_string(),
        "Settings I/O error: permission denied"
    );
    assert_eq!(
        SettingsError::SerializationError("bad json".to_string()).to_string(),
        "Settings serialization error: bad json"
    );
}

// === BridgeError / PolicySourceError Tests ===

#[test]
fn bridge_error_display_variants() {
    assert_eq!(
        BridgeError::Parse("expected value".to_string()).to_string(),
        "Bridge parse error: expected value"
    );
    assert_eq!(
        BridgeError::UnknownMessage("{}".to_string()).to_string(),
        "Unknown bridge message: {}"
    );
}

#[test]
fn policy_source_error_display_variants() {
    assert_eq!(
        PolicySourceError::Connection("refused".to_string()).to_string(),
        "Policy source connection error: refused"
    );
    assert_eq!(
        PolicySourceError::Protocol("not json".to_string()).to_string(),
        "Policy source protocol error: not json"
    );
}

#[test]
fn all_errors_are_boxable() {
    let errors: Vec<Box<dyn std::error::Error>> = vec![
        Box::new(BrowserOpError::Disconnected),
        Box::new(PolicyError::Invalid("x".to_string())),
        Box::new(StorageError::DatabaseError("x".to_string())),
        Box::new(SettingsError::IoError("x".to_string())),
        Box::new(BridgeError::Parse("x".to_string())),
        Box::new(PolicySourceError::Protocol("x".to_string())),
    ];
    assert!(errors.iter().all(|e| !e.to_string().is_empty()));
}
