mod bootstrap;
mod server;

use std::net::Ipv4Addr;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracker_core::models::Domain;
use tracker_core::settings::Settings;
use tracker_core::time_utils::TimezoneHandler;
use tracker_runtime::orchestrator::RefreshOrchestrator;
use tracker_runtime::source::RowSource;
use tracker_runtime::store::ResultStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Loaded before settings so `.env` values act as environment fallbacks.
    let dotenv = dotenvy::dotenv();
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;
    bootstrap::log_dotenv_result(&dotenv);

    tracing::info!("Activity Tracker v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Source: {}, Timezone: {}, Refresh: every {} hours",
        settings.source,
        settings.timezone,
        settings.refresh_interval_hours
    );

    let timezone = TimezoneHandler::new(&settings.timezone);
    if settings.source == "directory" {
        bootstrap::ensure_data_dir(&settings.data_dir_or_default())?;
    }
    let source = RowSource::from_settings(&settings)?;

    let store = ResultStore::new();
    let orchestrator = RefreshOrchestrator::new(
        source,
        store.clone(),
        timezone,
        Duration::from_secs(settings.refresh_interval_hours * 3600),
    );

    if let Some(key) = settings.test.as_deref() {
        return run_single(&orchestrator, key).await;
    }

    let handle = orchestrator.start();

    let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, settings.port))
        .await
        .with_context(|| format!("failed to bind port {}", settings.port))?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, server::router(store))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Ctrl+C received; shutting down");
        })
        .await?;

    handle.abort();
    Ok(())
}

/// Fetch and process one domain, print the result as pretty JSON and exit.
async fn run_single(orchestrator: &RefreshOrchestrator, key: &str) -> Result<()> {
    let domain: Domain = key.parse().with_context(|| {
        let keys: Vec<&str> = Domain::ALL.iter().map(|d| d.key()).collect();
        format!("available keys: {}", keys.join(", "))
    })?;

    tracing::info!("Testing {}", domain);
    let result = orchestrator
        .refresh_one(domain)
        .await
        .with_context(|| format!("error testing {}", domain))?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    tracing::info!("Test complete");
    Ok(())
}
