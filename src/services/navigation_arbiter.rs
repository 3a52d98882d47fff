//! Navigation Arbiter: decides what happens to a navigation and carries it out.
//!
//! Deciding is synchronous and only reads the policy snapshot and the tab
//! registry, so it cannot interleave with other handlers. Carrying out the
//! decision is asynchronous; failures there are logged and dropped because the
//! tab they target is usually already gone.

use tracing::{debug, info, warn};

use crate::browser::Browser;
use crate::managers::tab_registry::{TabRegistry, TabRegistryTrait};
use crate::services::policy_store::EffectivePolicy;
use crate::types::messages::{Notification, TabMessage};
use crate::types::navigation::{NavigationEvent, Remediation, ABOUT_BLANK};

/// Stateless decision core over a policy snapshot and the tab registry.
pub struct NavigationArbiter;

impl NavigationArbiter {
    /// Bookkeeping for a finished navigation. Only the main frame moves history.
    pub fn on_navigation_completed(registry: &mut TabRegistry, event: &NavigationEvent) {
        registry.ensure(event.tab_id);
        if !event.is_main_frame() {
            return;
        }
        registry.record_completion(event.tab_id, &event.url);
        debug!(tab_id = event.tab_id, url = %event.url, "navigation completed");
    }

    /// Decide the remediation for a navigation that is about to start.
    pub fn decide(
        policy: &EffectivePolicy,
        registry: &mut TabRegistry,
        event: &NavigationEvent,
    ) -> Remediation {
        registry.ensure(event.tab_id);

        if !policy.is_enforcing() || event.url == ABOUT_BLANK {
            return Remediation::Allow;
        }
        if policy.is_whitelisted(&event.url) {
            return Remediation::Allow;
        }

        if !event.is_main_frame() {
            if policy.iframe_allowed(&event.url) {
                return Remediation::Allow;
            }
            return Remediation::BlockFrame(event.clone());
        }

        let known_good = match registry.get(event.tab_id) {
            Some(record) if record.has_known_good_url() => record.current_url.as_str(),
            // Brand-new tab (e.g. "open in new tab") with nothing to fall back to.
            _ => {
                return Remediation::CloseTab {
                    tab_id: event.tab_id,
                }
            }
        };

        let url = if policy.is_whitelisted(known_good) {
            known_good.to_string()
        } else {
            policy.home_page().to_string()
        };
        Remediation::RedirectTab {
            tab_id: event.tab_id,
            url,
            blocked_url: event.url.clone(),
        }
    }

    /// Dispatch a remediation to the browser.
    ///
    /// Returns `true` when the main browser operation succeeded. Errors never
    /// propagate.
    pub async fn execute<B: Browser + ?Sized>(browser: &B, remediation: &Remediation) -> bool {
        match remediation {
            Remediation::Allow => true,
            Remediation::BlockFrame(event) => {
                info!(tab_id = event.tab_id, frame_id = event.frame_id, url = %event.url, "blocking iframe");
                let message = TabMessage::BlockFrame(event.clone());
                match browser.send_to_tab(event.tab_id, &message).await {
                    Ok(()) => true,
                    Err(e) => {
                        warn!(tab_id = event.tab_id, error = %e, "could not block iframe");
                        false
                    }
                }
            }
            Remediation::CloseTab { tab_id } => {
                info!(tab_id, "closing new tab opened on a blocked URL");
                match browser.close_tab(*tab_id).await {
                    Ok(()) => true,
                    Err(e) => {
                        warn!(tab_id, error = %e, "could not close tab");
                        false
                    }
                }
            }
            Remediation::RedirectTab {
                tab_id,
                url,
                blocked_url,
            } => {
                info!(tab_id, blocked = %blocked_url, fallback = %url, "blocked URL, redirecting tab");
                let applied = match browser.update_tab(*tab_id, url).await {
                    Ok(()) => true,
                    Err(e) => {
                        warn!(tab_id, error = %e, "could not redirect tab");
                        false
                    }
                };
                if let Err(e) = browser
                    .show_notification(&Notification::blocked_url(blocked_url))
                    .await
                {
                    warn!(error = %e, "could not show blocked URL notification");
                }
                applied
            }
        }
    }
}
