//! # Quality Engine
//! Pure, testable glue that maps a `FeatureVector` → `EvaluationResult`.
//! No I/O, no logging, no shared state; safe to call inline from async code.
//!
//! Order: feature evaluation (score, verdict, per-feature CFs), then the CF
//! fold over brightness, contrast, sharpness, noise, colorBalance.

use crate::certainty::{self, CfError};
use crate::evaluation::EvaluationResult;
use crate::features::{self, FeatureVector};

/// Evaluate `features` and combine the per-feature CFs into one certainty.
pub fn assess(features: &FeatureVector) -> Result<EvaluationResult, CfError> {
    let evaluation = features::evaluate(features);
    let combined = certainty::combine(&evaluation.feature_cfs.to_array())?;
    Ok(EvaluationResult::from_parts(evaluation, combined))
}
