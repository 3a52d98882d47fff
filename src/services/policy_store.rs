//! Policy Store: the current policy snapshot plus its compiled matchers.
//!
//! The snapshot is replaced wholesale behind an `Arc`, so a handler holding a
//! snapshot never sees a half-applied policy.

use std::sync::Arc;

use crate::services::pattern_matcher::PatternSet;
use crate::types::navigation::ABOUT_BLANK;
use crate::types::policy::{IframePolicy, Policy};

/// Compiled form of the iframe policy.
#[derive(Debug, Clone)]
pub enum IframeRule {
    AllowAll,
    BlockAll,
    AllowMatching(PatternSet),
}

/// A policy together with everything derived from it for enforcement.
#[derive(Debug, Clone)]
pub struct EffectivePolicy {
    pub policy: Policy,
    /// Configured whitelist, plus the home page when whitelisting is enabled.
    pub whitelist: PatternSet,
    pub iframe: IframeRule,
}

impl EffectivePolicy {
    pub fn compile(policy: Policy) -> Self {
        let mut whitelist = PatternSet::new(&policy.white_list.urls);
        if policy.white_list.enabled {
            whitelist.push(&policy.home_page);
        }

        let iframe = match &policy.white_list.iframe_enabled {
            IframePolicy::AllowAll => IframeRule::AllowAll,
            IframePolicy::BlockAll => IframeRule::BlockAll,
            IframePolicy::AllowMatching(patterns) => {
                // Nested frames start on about:blank before their real navigation.
                let mut set = PatternSet::new(patterns);
                set.push(ABOUT_BLANK);
                IframeRule::AllowMatching(set)
            }
        };

        Self {
            policy,
            whitelist,
            iframe,
        }
    }

    /// Whether navigations are subject to enforcement at all.
    ///
    /// An empty configured whitelist disables enforcement even when the
    /// `enabled` flag is set; the implicit home page entry does not count.
    pub fn is_enforcing(&self) -> bool {
        self.policy.white_list.enabled && !self.policy.white_list.urls.is_empty()
    }

    pub fn is_whitelisted(&self, url: &str) -> bool {
        self.whitelist.matches(url)
    }

    /// Whether a non-whitelisted URL may still load inside a nested frame.
    pub fn iframe_allowed(&self, url: &str) -> bool {
        match &self.iframe {
            IframeRule::AllowAll => true,
            IframeRule::BlockAll => false,
            IframeRule::AllowMatching(set) => set.matches(url),
        }
    }

    pub fn home_page(&self) -> &str {
        &self.policy.home_page
    }
}

/// Holds the current effective policy.
pub struct PolicyStore {
    current: Arc<EffectivePolicy>,
}

impl PolicyStore {
    pub fn new(policy: Policy) -> Self {
        Self {
            current: Arc::new(EffectivePolicy::compile(policy)),
        }
    }

    /// The snapshot in force right now.
    pub fn snapshot(&self) -> Arc<EffectivePolicy> {
        Arc::clone(&self.current)
    }

    pub fn policy(&self) -> &Policy {
        &self.current.policy
    }

    /// Swap in a new policy, returning the previous snapshot.
    pub fn replace(&mut self, policy: Policy) -> Arc<EffectivePolicy> {
        let next = Arc::new(EffectivePolicy::compile(policy));
        std::mem::replace(&mut self.current, next)
    }
}

impl Default for PolicyStore {
    fn default() -> Self {
        Self::new(Policy::default())
    }
}
