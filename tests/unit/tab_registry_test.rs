//! Unit tests for the TabRegistry.

use kiosk_guard::managers::tab_registry::{TabRegistry, TabRegistryTrait};
use kiosk_guard::types::tab::TabRecord;

#[test]
fn test_ensure_creates_empty_record() {
    let mut registry = TabRegistry::new();
    let record = registry.ensure(7);
    assert_eq!(*record, TabRecord::default());
    assert!(registry.contains(7));
    assert_eq!(registry.current_url(7), "");
}

#[test]
fn test_ensure_keeps_existing_record() {
    let mut registry = TabRegistry::new();
    registry.record_completion(1, "http://a/");
    registry.ensure(1);
    assert_eq!(registry.current_url(1), "http://a/");
}

#[test]
fn test_record_completion_shifts_history() {
    let mut registry = TabRegistry::new();
    registry.record_completion(1, "http://a/");
    registry.record_completion(1, "http://b/");

    let record = registry.get(1).unwrap();
    assert_eq!(record.current_url, "http://b/");
    assert_eq!(record.prior_url, "http://a/");
}

#[test]
fn test_seed_only_creates_missing_records() {
    let mut registry = TabRegistry::new();
    assert!(registry.seed(3, "http://a/"));
    assert!(!registry.seed(3, "http://b/"));
    assert_eq!(registry.current_url(3), "http://a/");
}

#[test]
fn test_seed_does_not_overwrite_brand_new_tab() {
    let mut registry = TabRegistry::new();
    registry.ensure(4);
    assert!(!registry.seed(4, "http://a/"));
    assert!(!registry.get(4).unwrap().has_known_good_url());
}

#[test]
fn test_remove_forgets_tab() {
    let mut registry = TabRegistry::new();
    registry.record_completion(5, "http://a/");
    let removed = registry.remove(5);
    assert_eq!(removed.map(|r| r.current_url), Some("http://a/".to_string()));
    assert!(!registry.contains(5));
    assert!(registry.is_empty());
    assert!(registry.remove(5).is_none());
}

#[test]
fn test_reused_id_starts_fresh_after_remove() {
    let mut registry = TabRegistry::new();
    registry.record_completion(9, "http://a/");
    registry.remove(9);
    registry.ensure(9);
    assert_eq!(registry.current_url(9), "");
}

#[test]
fn test_tab_ids_are_sorted() {
    let mut registry = TabRegistry::default();
    for id in [30, 10, 20] {
        registry.ensure(id);
    }
    assert_eq!(registry.tab_ids(), vec![10, 20, 30]);
    assert_eq!(registry.len(), 3);
}

#[test]
fn test_current_url_of_unknown_tab_is_empty() {
    let registry = TabRegistry::new();
    assert_eq!(registry.current_url(99), "");
    assert!(registry.get(99).is_none());
}
