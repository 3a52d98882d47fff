//! Kiosk guard demo mode.
//!
//! Runs the policy engine against the in-memory browser and prints what it
//! does for the typical kiosk situations. The real daemon is the
//! `kiosk-guard-server` binary.

use kiosk_guard::app::App;
use kiosk_guard::browser::recording::{BrowserCommand, RecordingBrowser};
use kiosk_guard::database::Database;
use kiosk_guard::managers::policy_repository::PolicyRepository;
use kiosk_guard::types::idle::IdleState;
use kiosk_guard::types::navigation::NavigationEvent;
use serde_json::json;

type DemoApp = App<RecordingBrowser, PolicyRepository>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    kiosk_guard::logging::init("warn");

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║              Kiosk Guard v{} — Demo Mode                ║", env!("CARGO_PKG_VERSION"));
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let db = Database::open_in_memory()?;
    let mut app: DemoApp = App::new(RecordingBrowser::new(), PolicyRepository::new(db));
    app.startup().await;

    demo_policy(&mut app).await?;
    demo_navigation(&mut app).await;
    demo_iframe(&mut app).await;
    demo_idle(&mut app).await?;

    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("  ✅ Demo finished");
    println!("═══════════════════════════════════════════════════════════════");
    Ok(())
}

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  📦 {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

fn print_commands(app: &DemoApp) {
    for command in app.browser().take_commands() {
        match command {
            BrowserCommand::Update { tab_id, url } => println!("  → tab {} navigated to {}", tab_id, url),
            BrowserCommand::Close { tab_id } => println!("  → tab {} closed", tab_id),
            BrowserCommand::Create { tab_id, url, .. } => println!("  → tab {} opened on {}", tab_id, url),
            BrowserCommand::Send { tab_id, message } => println!("  → tab {} received {:?}", tab_id, message),
            BrowserCommand::Notify(n) => println!("  → notification \"{}\": {}", n.title, n.message),
            BrowserCommand::SetIdleInterval(s) => println!("  → idle detection interval set to {}s", s),
        }
    }
}

async fn demo_policy(app: &mut DemoApp) -> Result<(), Box<dyn std::error::Error>> {
    section("Policy update");
    let good = app.browser().open_tab("http://good.com/page1");
    app.on_navigation_completed(&NavigationEvent::new(good, 0, "http://good.com/page1"));
    let stale = app.browser().open_tab("http://stale.example/");
    app.on_navigation_completed(&NavigationEvent::new(stale, 0, "http://stale.example/"));

    let report = app
        .on_policy_received(json!({
            "homePage": "http://good.com/home",
            "idleTime": 60,
            "whiteList": {
                "enabled": true,
                "urls": ["http://good.com/*"],
                "iframeEnabled": false
            },
            "screenSaver": { "enabled": true, "idleTime": 90, "text": "Touch me" }
        }))
        .await?;
    println!("  Re-scan produced {} remediation(s)", report.remediations.len());
    print_commands(app);

    let rejected = app.on_policy_received(json!({ "idleTime": 5 })).await;
    if let Err(e) = rejected {
        println!("  Rejected update: {}", e);
    }
    println!("  Home page still {}", app.policy().home_page);
    println!();
    Ok(())
}

async fn demo_navigation(app: &mut DemoApp) {
    section("Navigation arbiter");
    let tab = app.browser().open_tab("http://good.com/page1");
    app.on_navigation_completed(&NavigationEvent::new(tab, 0, "http://good.com/page1"));
    let remediation = app
        .on_before_navigate(&NavigationEvent::new(tab, 0, "http://evil.com"))
        .await;
    println!("  Known tab → evil.com: {:?}", remediation);

    let fresh = app.browser().open_tab("");
    let remediation = app
        .on_before_navigate(&NavigationEvent::new(fresh, 0, "http://evil.com"))
        .await;
    println!("  New tab → evil.com: {:?}", remediation);
    print_commands(app);
    println!();
}

async fn demo_iframe(app: &mut DemoApp) {
    section("Iframe blocking");
    let tab = app.browser().open_tab("http://good.com/page1");
    let remediation = app
        .on_before_navigate(&NavigationEvent::new(tab, 7, "http://ads.evil.com/frame"))
        .await;
    println!("  Frame 7 → ads.evil.com: {:?}", remediation);
    print_commands(app);
    println!();
}

async fn demo_idle(app: &mut DemoApp) -> Result<(), Box<dyn std::error::Error>> {
    section("Idle coordinator");
    let directives = app.on_idle_state_changed(IdleState::Idle).await;
    println!("  Idle fired: {:?}", directives);
    println!("  Screensaver pending: {}", app.next_timer_deadline().is_some());
    print_commands(app);

    let directives = app.on_idle_state_changed(IdleState::Active).await;
    println!("  User back: {:?}", directives);
    print_commands(app);
    println!("  Open tabs: {}", serde_json::to_string(&app.browser().tabs())?);
    Ok(())
}
