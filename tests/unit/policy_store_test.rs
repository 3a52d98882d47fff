//! Unit tests for the PolicyStore and policy parsing.

use kiosk_guard::services::policy_store::{EffectivePolicy, PolicyStore};
use kiosk_guard::types::errors::PolicyError;
use kiosk_guard::types::policy::{IframePolicy, Policy};
use serde_json::json;

fn whitelist_policy(urls: &[&str], iframe: serde_json::Value) -> Policy {
    Policy::from_json(json!({
        "homePage": "http://good.com/home",
        "idleTime": 0,
        "whiteList": { "enabled": true, "urls": urls, "iframeEnabled": iframe }
    }))
    .unwrap()
}

// ─── Parsing ───

#[test]
fn test_parse_full_policy() {
    let policy = Policy::from_json(json!({
        "homePage": "http://kiosk/",
        "idleTime": 120,
        "whiteList": { "enabled": true, "urls": ["http://kiosk/*"], "iframeEnabled": true },
        "screenSaver": { "enabled": true, "idleTime": 300, "text": "Hello" },
        "navBar": { "enabled": true, "enabledButtons": ["home"], "horizontalPosition": "left",
                    "verticalPosition": "top", "width": 50 },
        "virtualKeyboard": { "enabled": true }
    }))
    .unwrap();

    assert_eq!(policy.home_page, "http://kiosk/");
    assert_eq!(policy.idle_timeout_secs, 120);
    assert_eq!(policy.white_list.iframe_enabled, IframePolicy::AllowAll);
    assert_eq!(policy.screen_saver.idle_secs, 300);
    assert_eq!(policy.screen_saver.text, "Hello");
    assert_eq!(policy.nav_bar.enabled_buttons, vec!["home".to_string()]);
    assert_eq!(policy.nav_bar.width, 50.0);
    assert!(policy.virtual_keyboard.enabled);
}

#[test]
fn test_optional_sections_default() {
    let policy = whitelist_policy(&["http://good.com/*"], json!(false));
    assert!(!policy.screen_saver.enabled);
    assert_eq!(policy.screen_saver.text, "Touch me");
    assert_eq!(policy.nav_bar.width, 100.0);
    assert!(!policy.virtual_keyboard.enabled);
}

#[test]
fn test_partial_screen_saver_section() {
    let policy = Policy::from_json(json!({
        "homePage": "http://kiosk/",
        "idleTime": 0,
        "whiteList": { "enabled": false },
        "screenSaver": { "idleTime": 30 }
    }))
    .unwrap();
    assert_eq!(policy.screen_saver.idle_secs, 30);
    assert_eq!(policy.screen_saver.text, "Touch me");
    assert_eq!(policy.white_list.iframe_enabled, IframePolicy::BlockAll);
}

#[test]
fn test_fractional_nav_bar_width_is_accepted() {
    let policy = Policy::from_json(json!({
        "homePage": "http://kiosk/",
        "idleTime": 0,
        "whiteList": { "enabled": true, "urls": ["http://kiosk/*"] },
        "navBar": { "enabled": true, "width": 33.3 }
    }))
    .unwrap();
    assert_eq!(policy.nav_bar.width, 33.3);
    assert!(policy.white_list.enabled);
}

#[test]
fn test_idle_times_accept_any_number() {
    let policy = Policy::from_json(json!({
        "homePage": "http://kiosk/",
        "idleTime": 90.7,
        "whiteList": { "enabled": false },
        "screenSaver": { "enabled": true, "idleTime": -5 }
    }))
    .unwrap();
    assert_eq!(policy.idle_timeout_secs, 90);
    assert_eq!(policy.screen_saver.idle_secs, 0);
}

#[test]
fn test_default_policy_matches_stock_kiosk() {
    let policy = Policy::default();
    assert_eq!(policy.home_page, "https://salamek.github.io/chromium-kiosk/");
    assert!(!policy.white_list.enabled);
    assert_eq!(policy.nav_bar.width, 100.0);
}

#[test]
fn test_iframe_pattern_list() {
    let policy = whitelist_policy(&["http://good.com/*"], json!(["https://maps.example/*"]));
    assert_eq!(
        policy.white_list.iframe_enabled,
        IframePolicy::AllowMatching(vec!["https://maps.example/*".to_string()])
    );
}

#[test]
fn test_missing_required_field_is_malformed() {
    let err = Policy::from_json(json!({ "idleTime": 5, "whiteList": { "enabled": false } }))
        .unwrap_err();
    assert!(matches!(err, PolicyError::Malformed(_)));
}

#[test]
fn test_wrong_type_is_malformed() {
    let err = Policy::from_json(json!({
        "homePage": "http://a/", "idleTime": "soon", "whiteList": { "enabled": false }
    }))
    .unwrap_err();
    assert!(matches!(err, PolicyError::Malformed(_)));
}

#[test]
fn test_empty_home_page_is_invalid() {
    let err = Policy::from_json(json!({
        "homePage": "  ", "idleTime": 0, "whiteList": { "enabled": false }
    }))
    .unwrap_err();
    assert!(matches!(err, PolicyError::Invalid(_)));
}

#[test]
fn test_policy_serializes_with_wire_names() {
    let value = serde_json::to_value(whitelist_policy(&["http://good.com/*"], json!(false))).unwrap();
    assert_eq!(value["homePage"], "http://good.com/home");
    assert_eq!(value["idleTime"], 0);
    assert_eq!(value["whiteList"]["iframeEnabled"], false);
    assert_eq!(value["screenSaver"]["idleTime"], 0);
}

// ─── Effective policy ───

#[test]
fn test_home_page_is_implicitly_whitelisted() {
    let effective = EffectivePolicy::compile(whitelist_policy(&["http://good.com/page*"], json!(false)));
    assert!(effective.is_enforcing());
    assert!(effective.is_whitelisted("http://good.com/home"));
    assert!(effective.is_whitelisted("http://good.com/page1"));
    assert!(!effective.is_whitelisted("http://evil.com/"));
}

#[test]
fn test_whitelist_lists_home_page_after_configured_patterns() {
    let effective = EffectivePolicy::compile(whitelist_policy(&["http://good.com/*"], json!(false)));
    assert_eq!(effective.whitelist.len(), 2);
    assert_eq!(
        effective.whitelist.patterns(),
        vec!["http://good.com/*", "http://good.com/home"]
    );
}

#[test]
fn test_disabled_whitelist_does_not_enforce() {
    let mut policy = whitelist_policy(&["http://good.com/*"], json!(false));
    policy.white_list.enabled = false;
    let effective = EffectivePolicy::compile(policy);
    assert!(!effective.is_enforcing());
    assert!(!effective.is_whitelisted("http://good.com/home"));
}

#[test]
fn test_empty_url_list_does_not_enforce() {
    let effective = EffectivePolicy::compile(whitelist_policy(&[], json!(false)));
    assert!(!effective.is_enforcing());
}

#[test]
fn test_iframe_rules() {
    let block = EffectivePolicy::compile(whitelist_policy(&["http://good.com/*"], json!(false)));
    assert!(!block.iframe_allowed("http://ads.com/"));

    let allow = EffectivePolicy::compile(whitelist_policy(&["http://good.com/*"], json!(true)));
    assert!(allow.iframe_allowed("http://ads.com/"));

    let some = EffectivePolicy::compile(whitelist_policy(
        &["http://good.com/*"],
        json!(["https://maps.example/*"]),
    ));
    assert!(some.iframe_allowed("https://maps.example/embed"));
    assert!(some.iframe_allowed("about:blank"));
    assert!(!some.iframe_allowed("http://ads.com/"));
}

// ─── Store ───

#[test]
fn test_store_starts_with_default_policy() {
    let store = PolicyStore::default();
    assert_eq!(*store.policy(), Policy::default());
    assert!(!store.snapshot().is_enforcing());
}

#[test]
fn test_replace_swaps_snapshot_atomically() {
    let mut store = PolicyStore::default();
    let held = store.snapshot();

    let previous = store.replace(whitelist_policy(&["http://good.com/*"], json!(false)));

    assert_eq!(previous.policy, held.policy);
    assert_eq!(held.home_page(), "https://salamek.github.io/chromium-kiosk/");
    assert_eq!(store.snapshot().home_page(), "http://good.com/home");
    assert!(store.snapshot().is_enforcing());
}
