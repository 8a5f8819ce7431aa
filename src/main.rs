//! Photo Quality Service: Binary Entrypoint
//! Boots the Axum HTTP server, wiring config, the photo store and metrics.

use photo_quality_cf::config::ServiceConfig;
use photo_quality_cf::metrics::Metrics;
use shuttle_axum::ShuttleAxum;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - PHOTOQ_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("PHOTOQ_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("photo=info,evaluate=info,config=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    enable_dev_tracing();

    let cfg = ServiceConfig::load_default()?;
    info!(target: "config", ?cfg, "service config loaded");

    let mut router = photo_quality_cf::app(&cfg)?;
    if cfg.metrics_enabled {
        let metrics = Metrics::init()?;
        router = router.merge(metrics.router());
    }

    Ok(router.into())
}
