// Kiosk guard services
// Services implement the policy engine: matching, the policy store, the navigation
// arbiter, the idle coordinator, policy distribution and its WebSocket source, and settings.

pub mod idle_coordinator;
pub mod navigation_arbiter;
pub mod pattern_matcher;
pub mod policy_channel;
pub mod policy_source;
pub mod policy_store;
pub mod settings_engine;
