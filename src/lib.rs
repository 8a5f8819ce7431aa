// src/lib.rs
// Public library surface for integration tests (and potential reuse).

// Core engine: pure, synchronous, no I/O.
pub mod certainty;
pub mod engine;
pub mod evaluation;
pub mod features;

// Service layer around the engine.
pub mod api;
pub mod config;
pub mod demo;
pub mod extract;
pub mod metrics;
pub mod service;
pub mod store;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::certainty::{combine, CfError};
pub use crate::engine::assess;
pub use crate::evaluation::EvaluationResult;
pub use crate::features::{evaluate, score_feature, Feature, FeatureCfs, FeatureVector, Quality};

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tracing::info;

use crate::config::ServiceConfig;
use crate::service::PhotoService;
use crate::store::{InMemoryPhotoStore, PhotoRepository};

/// Wire store, extractor and service according to `cfg`.
pub fn build_state(cfg: &ServiceConfig) -> anyhow::Result<AppState> {
    let store = Arc::new(InMemoryPhotoStore::with_capacity(cfg.store_capacity));
    if cfg.seed_demo {
        let n = demo::seed(&store)?;
        info!(target: "photo", seeded = n, "demo photos loaded");
    }
    let repo: Arc<dyn PhotoRepository> = store;
    let photos = PhotoService::new(repo, extract::build_extractor(cfg.extractor))
        .with_processing_delay(Duration::from_millis(cfg.processing_delay_ms));
    Ok(AppState { photos })
}

/// Full in-process app without the metrics route (the Prometheus recorder is
/// process-global, so the binary installs it once and merges `/metrics` itself).
pub fn app(cfg: &ServiceConfig) -> anyhow::Result<Router> {
    Ok(api::create_router(build_state(cfg)?))
}
