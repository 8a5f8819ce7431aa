use anyhow::{Context, Result};
use axum::{routing::get, Router};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::evaluation::EvaluationResult;

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder. Call once per process.
    pub fn init() -> Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

/// Count one evaluation by verdict and record its combined CF.
/// No-op until a recorder is installed.
pub fn record_evaluation(result: &EvaluationResult) {
    counter!("photo_evaluations_total", "quality" => result.quality.as_str()).increment(1);
    if result.certainty_factor.is_finite() {
        histogram!("photo_certainty_factor").record(result.certainty_factor);
    }
}

pub fn record_upload() {
    counter!("photo_uploads_total").increment(1);
}
