// Kiosk guard state managers
// Managers own stateful data: the per-tab registry and the persisted policy slot.

pub mod policy_repository;
pub mod tab_registry;
