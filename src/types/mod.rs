// Kiosk guard shared type definitions
// Each submodule defines types used across the engine, the bridge and the daemon.

pub mod errors;
pub mod idle;
pub mod messages;
pub mod navigation;
pub mod policy;
pub mod settings;
pub mod tab;
