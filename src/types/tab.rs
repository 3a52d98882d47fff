/// Navigation history the engine keeps for one open tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabRecord {
    /// Last main-frame URL that finished loading. Empty for brand-new tabs.
    pub current_url: String,
    /// The main-frame URL completed just before `current_url`.
    pub prior_url: String,
}

impl TabRecord {
    pub fn with_url(url: &str) -> Self {
        Self {
            current_url: url.to_string(),
            prior_url: String::new(),
        }
    }

    /// Shift the current URL into history and record `url` as current.
    pub fn complete(&mut self, url: &str) {
        self.prior_url = std::mem::take(&mut self.current_url);
        self.current_url = url.to_string();
    }

    pub fn has_known_good_url(&self) -> bool {
        !self.current_url.is_empty()
    }
}
