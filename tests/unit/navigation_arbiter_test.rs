//! Unit tests for the Navigation Arbiter decision table and its dispatch.

use kiosk_guard::browser::recording::{BrowserCommand, RecordingBrowser};
use kiosk_guard::managers::tab_registry::{TabRegistry, TabRegistryTrait};
use kiosk_guard::services::navigation_arbiter::NavigationArbiter;
use kiosk_guard::services::policy_store::EffectivePolicy;
use kiosk_guard::types::messages::{Notification, TabMessage};
use kiosk_guard::types::navigation::{NavigationEvent, Remediation};
use kiosk_guard::types::policy::Policy;
use rstest::rstest;
use serde_json::json;

fn policy(iframe: serde_json::Value) -> EffectivePolicy {
    EffectivePolicy::compile(
        Policy::from_json(json!({
            "homePage": "http://good.com/home",
            "idleTime": 0,
            "whiteList": { "enabled": true, "urls": ["http://good.com/*"], "iframeEnabled": iframe }
        }))
        .unwrap(),
    )
}

fn registry_with(tab_id: i64, url: &str) -> TabRegistry {
    let mut registry = TabRegistry::new();
    registry.record_completion(tab_id, url);
    registry
}

// ─── Decision table ───

#[test]
fn test_new_tab_on_blocked_url_is_closed() {
    let mut registry = TabRegistry::new();
    let out = NavigationArbiter::decide(
        &policy(json!(false)),
        &mut registry,
        &NavigationEvent::new(1, 0, "http://evil.com"),
    );
    assert_eq!(out, Remediation::CloseTab { tab_id: 1 });
    assert!(registry.contains(1), "decide registers the tab");
}

#[test]
fn test_registered_tab_without_completed_page_is_closed() {
    let mut registry = TabRegistry::new();
    NavigationArbiter::on_navigation_completed(&mut registry, &NavigationEvent::new(6, 3, "http://good.com/frame"));
    assert!(!registry.get(6).unwrap().has_known_good_url());

    let out = NavigationArbiter::decide(
        &policy(json!(false)),
        &mut registry,
        &NavigationEvent::new(6, 0, "http://evil.com"),
    );
    assert_eq!(out, Remediation::CloseTab { tab_id: 6 });
}

#[test]
fn test_known_tab_is_redirected_to_its_page() {
    let mut registry = registry_with(2, "http://good.com/page1");
    let out = NavigationArbiter::decide(
        &policy(json!(false)),
        &mut registry,
        &NavigationEvent::new(2, 0, "http://evil.com"),
    );
    assert_eq!(
        out,
        Remediation::RedirectTab {
            tab_id: 2,
            url: "http://good.com/page1".to_string(),
            blocked_url: "http://evil.com".to_string(),
        }
    );
}

#[test]
fn test_tab_on_non_whitelisted_page_falls_back_to_home() {
    let mut registry = registry_with(3, "http://stale.example/");
    let out = NavigationArbiter::decide(
        &policy(json!(false)),
        &mut registry,
        &NavigationEvent::new(3, 0, "http://evil.com"),
    );
    assert_eq!(
        out,
        Remediation::RedirectTab {
            tab_id: 3,
            url: "http://good.com/home".to_string(),
            blocked_url: "http://evil.com".to_string(),
        }
    );
}

#[rstest]
#[case(0, "http://good.com/anything")]
#[case(0, "http://good.com/home")]
#[case(0, "about:blank")]
#[case(5, "about:blank")]
#[case(5, "http://good.com/widget")]
fn test_allowed_navigations(#[case] frame_id: i64, #[case] url: &str) {
    let mut registry = TabRegistry::new();
    let out = NavigationArbiter::decide(
        &policy(json!(false)),
        &mut registry,
        &NavigationEvent::new(1, frame_id, url),
    );
    assert_eq!(out, Remediation::Allow);
}

#[test]
fn test_blocked_iframe() {
    let mut registry = registry_with(4, "http://good.com/page1");
    let event = NavigationEvent::new(4, 9, "http://evil.com");
    let out = NavigationArbiter::decide(&policy(json!(false)), &mut registry, &event);
    assert_eq!(out, Remediation::BlockFrame(event));
}

#[rstest]
#[case(json!(true), "http://evil.com", true)]
#[case(json!(["https://maps.example/*"]), "https://maps.example/embed", true)]
#[case(json!(["https://maps.example/*"]), "http://evil.com", false)]
fn test_iframe_policy(
    #[case] iframe: serde_json::Value,
    #[case] url: &str,
    #[case] allowed: bool,
) {
    let mut registry = TabRegistry::new();
    let out = NavigationArbiter::decide(
        &policy(iframe),
        &mut registry,
        &NavigationEvent::new(1, 3, url),
    );
    assert_eq!(out.is_allow(), allowed);
}

#[test]
fn test_no_enforcement_without_whitelist() {
    let effective = EffectivePolicy::compile(Policy::default());
    let mut registry = TabRegistry::new();
    let out = NavigationArbiter::decide(
        &effective,
        &mut registry,
        &NavigationEvent::new(1, 0, "http://evil.com"),
    );
    assert_eq!(out, Remediation::Allow);
}

#[test]
fn test_decide_does_not_move_history() {
    let mut registry = registry_with(2, "http://good.com/page1");
    NavigationArbiter::decide(
        &policy(json!(false)),
        &mut registry,
        &NavigationEvent::new(2, 0, "http://good.com/page2"),
    );
    assert_eq!(registry.current_url(2), "http://good.com/page1");
}

// ─── Completion bookkeeping ───

#[test]
fn test_main_frame_completion_moves_history() {
    let mut registry = TabRegistry::new();
    NavigationArbiter::on_navigation_completed(&mut registry, &NavigationEvent::new(1, 0, "http://a/"));
    NavigationArbiter::on_navigation_completed(&mut registry, &NavigationEvent::new(1, 0, "http://b/"));
    let record = registry.get(1).unwrap();
    assert_eq!(record.current_url, "http://b/");
    assert_eq!(record.prior_url, "http://a/");
}

#[test]
fn test_subframe_completion_only_registers_tab() {
    let mut registry = TabRegistry::new();
    NavigationArbiter::on_navigation_completed(&mut registry, &NavigationEvent::new(1, 4, "http://a/"));
    assert!(registry.contains(1));
    assert_eq!(registry.current_url(1), "");
}

// ─── Dispatch ───

#[tokio::test]
async fn test_execute_redirect_updates_and_notifies() {
    let browser = RecordingBrowser::new();
    let tab = browser.open_tab("http://evil.com");
    let remediation = Remediation::RedirectTab {
        tab_id: tab,
        url: "http://good.com/page1".to_string(),
        blocked_url: "http://evil.com".to_string(),
    };

    assert!(NavigationArbiter::execute(&browser, &remediation).await);
    assert_eq!(browser.tab_url(tab).as_deref(), Some("http://good.com/page1"));
    assert_eq!(browser.notifications(), vec![Notification::blocked_url("http://evil.com")]);
}

#[tokio::test]
async fn test_execute_close_sends_no_notification() {
    let browser = RecordingBrowser::new();
    let tab = browser.open_tab("");
    assert!(NavigationArbiter::execute(&browser, &Remediation::CloseTab { tab_id: tab }).await);
    assert!(browser.tabs().is_empty());
    assert!(browser.notifications().is_empty());
}

#[tokio::test]
async fn test_execute_block_frame_messages_tab() {
    let browser = RecordingBrowser::new();
    let tab = browser.open_tab("http://good.com/page1");
    let event = NavigationEvent::new(tab, 9, "http://evil.com");

    assert!(NavigationArbiter::execute(&browser, &Remediation::BlockFrame(event.clone())).await);
    assert_eq!(browser.messages_for(tab), vec![TabMessage::BlockFrame(event)]);
    assert_eq!(browser.tab_url(tab).as_deref(), Some("http://good.com/page1"));
    assert!(browser.notifications().is_empty());
}

#[tokio::test]
async fn test_execute_swallows_vanished_tab() {
    let browser = RecordingBrowser::new();
    assert!(!NavigationArbiter::execute(&browser, &Remediation::CloseTab { tab_id: 77 }).await);

    let redirect = Remediation::RedirectTab {
        tab_id: 77,
        url: "http://good.com/".to_string(),
        blocked_url: "http://evil.com".to_string(),
    };
    assert!(!NavigationArbiter::execute(&browser, &redirect).await);
    assert_eq!(
        browser.commands().last(),
        Some(&BrowserCommand::Notify(Notification::blocked_url("http://evil.com")))
    );
}

#[tokio::test]
async fn test_execute_allow_is_noop() {
    let browser = RecordingBrowser::new();
    assert!(NavigationArbiter::execute(&browser, &Remediation::Allow).await);
    assert!(browser.commands().is_empty());
}
