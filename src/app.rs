//! Engine context for the kiosk guard.
//!
//! [`App`] owns all mutable state (policy store, tab registry, idle
//! coordinator) and the injected collaborators (browser, policy storage).
//! Every inbound event is a method on it; the event loop calls them one at a
//! time, so no locking is needed. Browser calls inside a handler may still
//! fail because the browser moved on in the meantime; those failures are
//! logged and dropped.

use std::sync::Arc;

use futures::future::join_all;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::browser::Browser;
use crate::managers::policy_repository::PolicyStorage;
use crate::managers::tab_registry::{TabRegistry, TabRegistryTrait};
use crate::services::idle_coordinator::IdleCoordinator;
use crate::services::navigation_arbiter::NavigationArbiter;
use crate::services::policy_channel;
use crate::services::policy_store::{EffectivePolicy, PolicyStore};
use crate::types::errors::PolicyError;
use crate::types::idle::{IdleDirective, IdleState};
use crate::types::messages::{Notification, TabMessage};
use crate::types::navigation::{BrowserEvent, NavigationEvent, OpenTab, Remediation, TabId};
use crate::types::policy::Policy;

/// What a policy installation did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyReport {
    /// Remediations dispatched by the re-scan of open tabs.
    pub remediations: Vec<Remediation>,
    /// Idle detection interval pushed to the host, if any.
    pub detection_interval_secs: Option<u64>,
}

/// The navigation policy engine.
pub struct App<B: Browser, S: PolicyStorage> {
    browser: B,
    storage: S,
    store: PolicyStore,
    registry: TabRegistry,
    idle: IdleCoordinator,
}

impl<B: Browser, S: PolicyStorage> App<B, S> {
    /// Creates an engine with the built-in default policy. Call
    /// [`startup`](Self::startup) to load the persisted policy and enforce it.
    pub fn new(browser: B, storage: S) -> Self {
        Self {
            browser,
            storage,
            store: PolicyStore::default(),
            registry: TabRegistry::new(),
            idle: IdleCoordinator::new(),
        }
    }

    /// Startup sequence: load the last applied policy (or the default),
    /// configure idle detection and enforce the policy on already open tabs.
    pub async fn startup(&mut self) -> ApplyReport {
        let policy = match self.storage.load_persisted_policy() {
            Ok(Some(policy)) => match policy.validate() {
                Ok(()) => policy,
                Err(e) => {
                    warn!(error = %e, "persisted policy is unusable, using defaults");
                    Policy::default()
                }
            },
            Ok(None) => Policy::default(),
            Err(e) => {
                warn!(error = %e, "could not load persisted policy, using defaults");
                Policy::default()
            }
        };
        info!(home_page = %policy.home_page, "starting with policy");
        self.install_policy(policy).await
    }

    /// Dispatch one browser event to its handler.
    pub async fn handle_event(&mut self, event: BrowserEvent) {
        match event {
            BrowserEvent::BeforeNavigate(nav) => {
                self.on_before_navigate(&nav).await;
            }
            BrowserEvent::NavigationCompleted(nav) => self.on_navigation_completed(&nav),
            BrowserEvent::TabRemoved { tab_id } => self.on_tab_removed(tab_id),
            BrowserEvent::IdleStateChanged { state } => {
                self.on_idle_state_changed(state).await;
            }
        }
    }

    /// Enforcement point: runs before a frame starts loading `event.url`.
    pub async fn on_before_navigate(&mut self, event: &NavigationEvent) -> Remediation {
        let policy = self.store.snapshot();
        let remediation = NavigationArbiter::decide(&policy, &mut self.registry, event);
        if NavigationArbiter::execute(&self.browser, &remediation).await {
            self.forget_closed(&remediation);
        }
        remediation
    }

    pub fn on_navigation_completed(&mut self, event: &NavigationEvent) {
        NavigationArbiter::on_navigation_completed(&mut self.registry, event);
    }

    pub fn on_tab_removed(&mut self, tab_id: TabId) {
        self.registry.remove(tab_id);
    }

    /// Feed the host idle signal. Returns the directives that were carried out.
    pub async fn on_idle_state_changed(&mut self, state: IdleState) -> Vec<IdleDirective> {
        let directives = self.idle.on_state_changed(state, Instant::now());
        self.run_directives(&directives).await;
        directives
    }

    /// Called by the event loop once [`next_timer_deadline`](Self::next_timer_deadline) passes.
    pub async fn on_timer(&mut self) -> Vec<IdleDirective> {
        let directives = self.idle.poll_timer(Instant::now());
        self.run_directives(&directives).await;
        directives
    }

    pub fn next_timer_deadline(&self) -> Option<Instant> {
        self.idle.next_deadline()
    }

    /// A policy snapshot arrived from the configuration source.
    ///
    /// Malformed snapshots are rejected and the current policy stays in force.
    pub async fn on_policy_received(
        &mut self,
        value: serde_json::Value,
    ) -> Result<ApplyReport, PolicyError> {
        let policy = policy_channel::accept(value)?;
        Ok(self.apply_policy(policy).await)
    }

    /// Replace the policy, enforce it on open tabs, persist it and push it to
    /// the in-page UI.
    pub async fn apply_policy(&mut self, policy: Policy) -> ApplyReport {
        let report = self.install_policy(policy).await;

        let policy = self.store.policy().clone();
        if let Err(e) = self.storage.persist_policy(&policy) {
            warn!(error = %e, "could not persist policy");
        }

        let tabs = self.open_tabs().await;
        policy_channel::broadcast(&self.browser, &tabs, &policy).await;
        if let Err(e) = self
            .browser
            .show_notification(&Notification::configuration_updated())
            .await
        {
            warn!(error = %e, "could not show configuration notification");
        }
        info!(
            patterns = self.store.snapshot().whitelist.len(),
            remediations = report.remediations.len(),
            "policy applied"
        );
        report
    }

    async fn install_policy(&mut self, policy: Policy) -> ApplyReport {
        self.store.replace(policy);
        let snapshot: Arc<EffectivePolicy> = self.store.snapshot();
        debug!(
            whitelist = ?snapshot.whitelist.patterns(),
            enforcing = snapshot.is_enforcing(),
            "policy installed"
        );

        let detection_interval_secs = self.idle.configure(&snapshot.policy);
        if let Some(seconds) = detection_interval_secs {
            if let Err(e) = self.browser.set_idle_detection_interval(seconds).await {
                warn!(seconds, error = %e, "could not set idle detection interval");
            }
        }

        let tabs = self.open_tabs().await;
        let remediations = policy_channel::plan_rescan(&snapshot, &mut self.registry, &tabs);
        self.execute_all(&remediations).await;

        ApplyReport {
            remediations,
            detection_interval_secs,
        }
    }

    async fn execute_all(&mut self, remediations: &[Remediation]) {
        let browser = &self.browser;
        let outcomes = join_all(
            remediations
                .iter()
                .map(|r| NavigationArbiter::execute(browser, r)),
        )
        .await;
        for (remediation, applied) in remediations.iter().zip(outcomes) {
            if applied {
                self.forget_closed(remediation);
            }
        }
    }

    fn forget_closed(&mut self, remediation: &Remediation) {
        if let Remediation::CloseTab { tab_id } = remediation {
            self.registry.remove(*tab_id);
        }
    }

    async fn run_directives(&mut self, directives: &[IdleDirective]) {
        for directive in directives {
            match directive {
                IdleDirective::ResetToHome => self.reset_to_home().await,
                IdleDirective::ShowScreensaver => self.broadcast_screensaver(true).await,
                IdleDirective::HideScreensaver => self.broadcast_screensaver(false).await,
            }
        }
    }

    /// Open the home page in a fresh active tab and close every other tab.
    async fn reset_to_home(&mut self) {
        let home_page = self.store.policy().home_page.clone();
        let home = match self.browser.create_tab(&home_page, true).await {
            Ok(tab) => tab,
            Err(e) => {
                warn!(error = %e, "could not open home page tab");
                return;
            }
        };

        let tabs = self.open_tabs().await;
        let browser = &self.browser;
        let closes = tabs
            .iter()
            .filter(|tab| tab.tab_id != home.tab_id)
            .map(|tab| async move { (tab.tab_id, browser.close_tab(tab.tab_id).await) });
        for (tab_id, result) in join_all(closes).await {
            match result {
                Ok(()) => {
                    self.registry.remove(tab_id);
                }
                Err(e) => warn!(tab_id, error = %e, "could not close tab during idle reset"),
            }
        }
    }

    async fn broadcast_screensaver(&self, show: bool) {
        let tabs = self.open_tabs().await;
        let message = TabMessage::ScreenSaver { show };
        let browser = &self.browser;
        let message = &message;
        let sends = tabs.iter().map(|tab| async move {
            if let Err(e) = browser.send_to_tab(tab.tab_id, message).await {
                warn!(tab_id = tab.tab_id, error = %e, "could not toggle screensaver");
            }
        });
        join_all(sends).await;
    }

    async fn open_tabs(&self) -> Vec<OpenTab> {
        match self.browser.list_open_tabs().await {
            Ok(tabs) => tabs,
            Err(e) => {
                warn!(error = %e, "could not list open tabs");
                Vec::new()
            }
        }
    }

    pub fn browser(&self) -> &B {
        &self.browser
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn registry(&self) -> &TabRegistry {
        &self.registry
    }

    pub fn policy(&self) -> &Policy {
        self.store.policy()
    }

    pub fn policy_snapshot(&self) -> Arc<EffectivePolicy> {
        self.store.snapshot()
    }

    pub fn idle_coordinator(&self) -> &IdleCoordinator {
        &self.idle
    }
}
