//! Kiosk guard server: the policy engine wired to a real browser.
//!
//! Browser protocol: one JSON object per line on stdin/stdout, see
//! `kiosk_guard::browser::stdio_bridge`. Policy updates arrive over a
//! WebSocket from the configuration server. Logs go to stderr.

use std::process::ExitCode;
use std::time::Duration;

use tokio::io::BufReader;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{error, info, warn};

use kiosk_guard::app::App;
use kiosk_guard::browser::stdio_bridge::{self, BridgeBrowser};
use kiosk_guard::database::Database;
use kiosk_guard::logging;
use kiosk_guard::managers::policy_repository::PolicyRepository;
use kiosk_guard::services::policy_source;
use kiosk_guard::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use kiosk_guard::types::settings::GuardSettings;

/// Resolves when `deadline` passes; never resolves without one.
async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let mut settings_engine = SettingsEngine::new(std::env::var("KIOSK_GUARD_SETTINGS").ok());
    let settings = match settings_engine.load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("kiosk-guard: {}; using default settings", e);
            GuardSettings::default()
        }
    };
    logging::init(&settings.log_filter);

    let db_path = settings_engine.database_path();
    if let Some(parent) = db_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            warn!(path = %parent.display(), error = %e, "could not create data directory");
        }
    }
    let db = match Database::open(&db_path) {
        Ok(db) => db,
        Err(e) => {
            error!(path = %db_path.display(), error = %e, "could not open policy database");
            return ExitCode::FAILURE;
        }
    };

    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let browser = BridgeBrowser::new(
        outbound_tx,
        Duration::from_secs(settings.browser_call_timeout_secs),
    );
    let (event_tx, mut events) = mpsc::unbounded_channel();
    tokio::spawn(stdio_bridge::run_reader(
        BufReader::new(tokio::io::stdin()),
        browser.pending_calls(),
        event_tx,
    ));
    tokio::spawn(stdio_bridge::run_writer(outbound_rx, tokio::io::stdout()));

    let (policy_tx, mut policies) = mpsc::channel(16);
    tokio::spawn(policy_source::run(
        settings.policy_source_url.clone(),
        Duration::from_secs(settings.reconnect_delay_secs),
        policy_tx,
    ));

    let mut app = App::new(browser, PolicyRepository::new(db));
    let report = app.startup().await;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        remediations = report.remediations.len(),
        "kiosk guard ready"
    );

    loop {
        let deadline = app.next_timer_deadline();
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => app.handle_event(event).await,
                None => {
                    info!("browser bridge closed, shutting down");
                    break;
                }
            },
            Some(policy) = policies.recv() => {
                if let Err(e) = app.on_policy_received(policy).await {
                    warn!(error = %e, "policy update rejected");
                }
            }
            _ = sleep_until(deadline) => {
                app.on_timer().await;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted, shutting down");
                break;
            }
        }
    }

    ExitCode::SUCCESS
}
