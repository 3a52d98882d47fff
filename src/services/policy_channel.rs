//! Policy Distribution Channel helpers.
//!
//! Validation of incoming snapshots, the re-scan of already open tabs against
//! a new policy, and the broadcast of the policy to the in-page UI. The
//! sequencing of a full policy application lives in [`crate::app::App::apply_policy`].

use futures::future::join_all;
use tracing::{debug, warn};

use crate::browser::Browser;
use crate::managers::tab_registry::{TabRegistry, TabRegistryTrait};
use crate::services::navigation_arbiter::NavigationArbiter;
use crate::services::policy_store::EffectivePolicy;
use crate::types::errors::PolicyError;
use crate::types::messages::TabMessage;
use crate::types::navigation::{NavigationEvent, OpenTab, Remediation, MAIN_FRAME};
use crate::types::policy::Policy;

/// Parse and validate a snapshot from the configuration source.
///
/// On failure nothing is applied; the caller keeps its current policy.
pub fn accept(value: serde_json::Value) -> Result<Policy, PolicyError> {
    Policy::from_json(value).inspect_err(|e| {
        warn!(error = %e, "rejected policy update, keeping last known good policy");
    })
}

/// Decide what to do with every open tab under `policy`.
///
/// Each tab's browser-reported URL is treated as a main-frame navigation.
/// Tabs the registry has never observed are seeded with that URL as their
/// known-good page first, so they are redirected rather than closed.
pub fn plan_rescan(
    policy: &EffectivePolicy,
    registry: &mut TabRegistry,
    tabs: &[OpenTab],
) -> Vec<Remediation> {
    tabs.iter()
        .map(|tab| {
            if registry.seed(tab.tab_id, &tab.url) {
                debug!(tab_id = tab.tab_id, url = %tab.url, "seeded unobserved tab");
            }
            let event = NavigationEvent::new(tab.tab_id, MAIN_FRAME, tab.url.clone());
            NavigationArbiter::decide(policy, registry, &event)
        })
        .filter(|r| !r.is_allow())
        .collect()
}

/// Send the new policy to every tab so the in-page UI re-renders.
pub async fn broadcast<B: Browser + ?Sized>(browser: &B, tabs: &[OpenTab], policy: &Policy) {
    let message = TabMessage::AppConfig(Box::new(policy.clone()));
    let sends = tabs.iter().map(|tab| {
        let message = &message;
        async move {
            if let Err(e) = browser.send_to_tab(tab.tab_id, message).await {
                warn!(tab_id = tab.tab_id, error = %e, "could not deliver policy to tab");
            }
        }
    });
    join_all(sends).await;
}
