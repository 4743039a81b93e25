//! # UdyamX App Library
//!
//! Wires configuration, storage, the AI gateway and background tasks
//! together and runs the terminal shell.
//!
//! ## Module Organization
//! ```text
//! udyamx_app/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── state/
//! │   ├── mod.rs      ◄─── AppContext
//! │   ├── config.rs   ◄─── Layered configuration
//! │   ├── i18n.rs     ◄─── Locale tables + active locale
//! │   ├── invoice.rs  ◄─── The editable invoice form
//! │   ├── chat.rs     ◄─── Co-Pilot transcript
//! │   ├── nav.rs      ◄─── Active tab and view filters
//! │   ├── alerts.rs   ◄─── Pending user alerts
//! │   ├── notifications.rs
//! │   └── sync.rs     ◄─── Sync results → alerts/notifications
//! ├── commands/       ◄─── One function per user action
//! ├── voice/
//! │   ├── mod.rs      ◄─── Voice session actor
//! │   └── console.rs  ◄─── Terminal speech backend
//! ├── shell.rs        ◄─── Render + read loop
//! └── error.rs        ◄─── ApiError for commands
//! ```

pub mod commands;
pub mod error;
pub mod shell;
pub mod state;
pub mod voice;

use std::sync::Arc;
use std::time::Duration;

use tokio::io::BufReader;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;
use udyamx_ai::{AiGateway, CannedGateway, GeminiGateway};
use udyamx_store::{Database, DbConfig};
use udyamx_sync::QueuedInvoiceSync;

use shell::Shell;
use state::{load_translations, spawn_scheme_notification, AppConfig, AppContext};
use voice::console::ConsoleSpeech;

/// Runs the application until the user quits or stdin closes.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │     • Default: INFO, can be overridden with RUST_LOG                    │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults → udyamx.toml → UDYAMX_* environment                     │
/// │                                                                         │
/// │  3. Open Local Store ─────────────────────────────────────────────────► │
/// │     • SQLite file in the data directory, migrations applied             │
/// │                                                                         │
/// │  4. Choose AI Gateway ────────────────────────────────────────────────► │
/// │     • Gemini when an API key is configured, canned replies otherwise    │
/// │                                                                         │
/// │  5. Start Background Tasks ───────────────────────────────────────────► │
/// │     • Queued invoice sync, scheme notification, voice session           │
/// │                                                                         │
/// │  6. Run Shell ────────────────────────────────────────────────────────► │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting UdyamX");

    let config = AppConfig::load_or_default(None);
    let db_path = config.database_path();
    info!(?db_path, "Database path determined");

    let db = Database::new(DbConfig::new(db_path)).await?;
    info!("Database connected and migrations applied");

    let translations = load_translations(&config.locales_dir());
    let gateway = choose_gateway(&config);
    let (speech, mic) = ConsoleSpeech::connect();

    let ctx = AppContext::new(config, db, translations, gateway, Some(speech)).await;

    let (sync_task, sync_handle) = QueuedInvoiceSync::new(
        ctx.db.invoices(),
        ctx.connectivity.clone(),
        &ctx.config.sync,
        Arc::new(ctx.sync_emitter()),
    );
    tokio::spawn(sync_task.run());

    let scheme_task = spawn_scheme_notification(
        ctx.notifications.clone(),
        ctx.i18n.clone(),
        Duration::from_secs(ctx.config.notifications.scheme_delay_secs),
    );

    let shell = Shell::new(ctx, Some(mic));
    let result = shell.run(BufReader::new(tokio::io::stdin())).await;

    scheme_task.abort();
    if let Err(e) = sync_handle.shutdown().await {
        warn!(error = %e, "Sync task already stopped");
    }

    result?;
    info!("UdyamX stopped");
    Ok(())
}

/// Gemini when a key is configured, canned replies otherwise.
fn choose_gateway(config: &AppConfig) -> Arc<dyn AiGateway> {
    let offline = || {
        Arc::new(CannedGateway::new().with_latency(Duration::from_millis(config.ai.offline_latency_ms)))
            as Arc<dyn AiGateway>
    };

    match config.ai.gemini() {
        Some(gemini) => match GeminiGateway::new(gemini) {
            Ok(gateway) => {
                info!(model = %config.ai.model, "Using Gemini gateway");
                Arc::new(gateway)
            }
            Err(e) => {
                warn!(error = %e, "Gemini gateway unavailable, using offline replies");
                offline()
            }
        },
        None => {
            info!("No API key configured, using offline replies");
            offline()
        }
    }
}

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr so they never interleave with the rendered screen.
/// Set `RUST_LOG` to override, e.g. `RUST_LOG=udyamx=trace`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,udyamx=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .with_writer(std::io::stderr)
        .init();
}
