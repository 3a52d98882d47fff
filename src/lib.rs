//! Kiosk guard: keeps a kiosk browser on approved content.
//!
//! The engine watches navigation, tab and idle events, redirects or closes
//! tabs that leave the URL whitelist, blanks disallowed iframes and resets the
//! browser after inactivity. Policy arrives at runtime and applies to tabs
//! that are already open.
//!
//! This library crate exposes all modules for use by the binaries and integration tests.

pub mod app;
pub mod browser;
pub mod database;
pub mod logging;
pub mod managers;
pub mod platform;
pub mod services;
pub mod types;
