use std::collections::HashMap;

use crate::types::navigation::TabId;
use crate::types::tab::TabRecord;

/// Trait defining the tab registry interface.
pub trait TabRegistryTrait {
    fn ensure(&mut self, tab_id: TabId) -> &mut TabRecord;
    fn seed(&mut self, tab_id: TabId, url: &str) -> bool;
    fn record_completion(&mut self, tab_id: TabId, url: &str);
    fn remove(&mut self, tab_id: TabId) -> Option<TabRecord>;
    fn get(&self, tab_id: TabId) -> Option<&TabRecord>;
    fn contains(&self, tab_id: TabId) -> bool;
    fn current_url(&self, tab_id: TabId) -> &str;
    fn tab_ids(&self) -> Vec<TabId>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool;
}

/// Per-tab navigation history, keyed by browser tab ID.
pub struct TabRegistry {
    records: HashMap<TabId, TabRecord>,
}

impl TabRegistry {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }
}

impl Default for TabRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TabRegistryTrait for TabRegistry {
    /// Return the record for `tab_id`, creating an empty one on first sight.
    fn ensure(&mut self, tab_id: TabId) -> &mut TabRecord {
        self.records.entry(tab_id).or_default()
    }

    /// Create a record whose known-good URL is `url`, unless one already exists.
    /// Returns whether a record was created.
    fn seed(&mut self, tab_id: TabId, url: &str) -> bool {
        if self.records.contains_key(&tab_id) {
            return false;
        }
        self.records.insert(tab_id, TabRecord::with_url(url));
        true
    }

    /// A main-frame navigation finished: shift current into prior, store `url`.
    fn record_completion(&mut self, tab_id: TabId, url: &str) {
        self.ensure(tab_id).complete(url);
    }

    fn remove(&mut self, tab_id: TabId) -> Option<TabRecord> {
        self.records.remove(&tab_id)
    }

    fn get(&self, tab_id: TabId) -> Option<&TabRecord> {
        self.records.get(&tab_id)
    }

    fn contains(&self, tab_id: TabId) -> bool {
        self.records.contains_key(&tab_id)
    }

    /// Known-good URL of the tab, empty if the tab is unknown or brand new.
    fn current_url(&self, tab_id: TabId) -> &str {
        self.records
            .get(&tab_id)
            .map(|r| r.current_url.as_str())
            .unwrap_or("")
    }

    fn tab_ids(&self) -> Vec<TabId> {
        let mut ids: Vec<TabId> = self.records.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
