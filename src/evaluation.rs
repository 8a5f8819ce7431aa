//! evaluation.rs: the record one analysis produces.
//!
//! `EvaluationResult` is what the upload path persists next to a photo: the
//! weighted score, the good/bad verdict, the five per-feature CFs and the
//! combined CF. JSON keys follow the web client (`featureCFs`, `certaintyFactor`).

use serde::{Deserialize, Serialize};

use crate::features::{FeatureCfs, FeatureEvaluation, Quality};

/// Complete, immutable result of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Weighted score, expected in `[0,1]` for normalized inputs.
    pub score: f64,
    pub quality: Quality,
    #[serde(rename = "featureCFs")]
    pub feature_cfs: FeatureCfs,
    /// Left fold of `feature_cfs` in feature order.
    #[serde(rename = "certaintyFactor")]
    pub certainty_factor: f64,
}

impl EvaluationResult {
    pub fn from_parts(evaluation: FeatureEvaluation, certainty_factor: f64) -> Self {
        Self {
            score: evaluation.score,
            quality: evaluation.quality,
            feature_cfs: evaluation.feature_cfs,
            certainty_factor,
        }
    }

    /// Score as a whole percentage, as shown on the photo detail page.
    pub fn score_percent(&self) -> u32 {
        (self.score * 100.0).round().clamp(0.0, 100.0) as u32
    }
}
