//! # Feature Evaluator
//!
//! Maps five normalized photo measurements to:
//! - a weighted quality score (`evaluate`),
//! - one certainty factor per feature (`score_feature`).
//!
//! Every per-feature CF lies in `[CF_FLOOR, CF_CEILING]`: each feature counts as
//! at least moderately certain and never as fully certain.
//! Thresholds, importances and weights are compiled-in constants.

use serde::{Deserialize, Serialize};

/// Minimum certainty assigned to any feature.
pub const CF_FLOOR: f64 = 0.7;
/// Maximum certainty assigned to any feature.
pub const CF_CEILING: f64 = 0.98;
/// Scores strictly above this are `Quality::Good`.
pub const GOOD_SCORE_THRESHOLD: f64 = 0.6;

/// The five measurements, in the fixed order used everywhere a CF sequence
/// is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Feature {
    Brightness,
    Contrast,
    Sharpness,
    Noise,
    ColorBalance,
}

impl Feature {
    pub const ALL: [Feature; 5] = [
        Feature::Brightness,
        Feature::Contrast,
        Feature::Sharpness,
        Feature::Noise,
        Feature::ColorBalance,
    ];

    /// `(threshold, importance)` for this feature. Noise is compared as `1 - noise`.
    pub const fn threshold(self) -> FeatureThreshold {
        match self {
            Feature::Brightness => FeatureThreshold::new(0.65, 0.8),
            Feature::Contrast => FeatureThreshold::new(0.70, 0.9),
            Feature::Sharpness => FeatureThreshold::new(0.75, 1.0),
            Feature::Noise => FeatureThreshold::new(0.80, 0.7),
            Feature::ColorBalance => FeatureThreshold::new(0.70, 0.6),
        }
    }

    /// Contribution of this feature to the overall score. Weights sum to 1.0;
    /// sharpness dominates, colour balance matters least.
    pub const fn score_weight(self) -> f64 {
        match self {
            Feature::Brightness => 0.2,
            Feature::Contrast => 0.2,
            Feature::Sharpness => 0.3,
            Feature::Noise => 0.2,
            Feature::ColorBalance => 0.1,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Feature::Brightness => "brightness",
            Feature::Contrast => "contrast",
            Feature::Sharpness => "sharpness",
            Feature::Noise => "noise",
            Feature::ColorBalance => "colorBalance",
        }
    }
}

/// Reference point and amplification for one feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureThreshold {
    pub threshold: f64,
    pub importance: f64,
}

impl FeatureThreshold {
    pub const fn new(threshold: f64, importance: f64) -> Self {
        Self {
            threshold,
            importance,
        }
    }
}

/// Raw measurements, nominally in `[0,1]`. Higher is better except `noise`.
/// Out-of-range values are accepted; validation is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureVector {
    pub brightness: f64,
    pub contrast: f64,
    pub sharpness: f64,
    pub noise: f64,
    pub color_balance: f64,
}

impl FeatureVector {
    pub fn new(
        brightness: f64,
        contrast: f64,
        sharpness: f64,
        noise: f64,
        color_balance: f64,
    ) -> Self {
        Self {
            brightness,
            contrast,
            sharpness,
            noise,
            color_balance,
        }
    }

    /// Raw value as measured (noise not inverted).
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Brightness => self.brightness,
            Feature::Contrast => self.contrast,
            Feature::Sharpness => self.sharpness,
            Feature::Noise => self.noise,
            Feature::ColorBalance => self.color_balance,
        }
    }

    /// Value oriented so that higher is better (`1 - noise` for noise).
    pub fn oriented(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Noise => 1.0 - self.noise,
            other => self.get(other),
        }
    }

    /// True when every measurement is finite and inside `[0,1]`.
    pub fn is_normalized(&self) -> bool {
        Feature::ALL
            .iter()
            .all(|&f| (0.0..=1.0).contains(&self.get(f)))
    }
}

/// Per-feature certainty factors, same field order as `FeatureVector`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureCfs {
    pub brightness: f64,
    pub contrast: f64,
    pub sharpness: f64,
    pub noise: f64,
    pub color_balance: f64,
}

impl FeatureCfs {
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Brightness => self.brightness,
            Feature::Contrast => self.contrast,
            Feature::Sharpness => self.sharpness,
            Feature::Noise => self.noise,
            Feature::ColorBalance => self.color_balance,
        }
    }

    /// CFs in folding order: brightness, contrast, sharpness, noise, colorBalance.
    pub fn to_array(&self) -> [f64; 5] {
        [
            self.brightness,
            self.contrast,
            self.sharpness,
            self.noise,
            self.color_balance,
        ]
    }
}

/// Binary verdict derived from the weighted score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Good,
    Bad,
}

impl Quality {
    /// Strict threshold: a score of exactly 0.6 is `Bad`.
    pub fn from_score(score: f64) -> Self {
        if score > GOOD_SCORE_THRESHOLD {
            Quality::Good
        } else {
            Quality::Bad
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Quality::Good => "good",
            Quality::Bad => "bad",
        }
    }
}

/// Score plus verdict plus per-feature CFs; the combined CF is added in
/// `engine::assess`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureEvaluation {
    pub score: f64,
    pub quality: Quality,
    pub feature_cfs: FeatureCfs,
}

/// Certainty for one feature: `min(0.98, 0.7 + |value - threshold| * importance)`.
///
/// `value` must already be oriented (pass `1 - noise` for noise). NaN is not
/// special-cased and comes out as NaN.
pub fn score_feature(value: f64, threshold: f64, importance: f64) -> f64 {
    let distance = (value - threshold).abs() * importance;
    let cf = CF_FLOOR + distance;
    // Explicit compare instead of f64::min, which would swallow a NaN.
    if cf > CF_CEILING {
        CF_CEILING
    } else {
        cf
    }
}

/// CF for one feature of `features`, using the compiled-in threshold table.
pub fn feature_cf(features: &FeatureVector, feature: Feature) -> f64 {
    let t = feature.threshold();
    score_feature(features.oriented(feature), t.threshold, t.importance)
}

/// Weighted linear score, summed in the fixed feature order.
pub fn weighted_score(features: &FeatureVector) -> f64 {
    Feature::ALL.iter().fold(0.0, |acc, &f| {
        acc + features.oriented(f) * f.score_weight()
    })
}

/// Score, verdict and per-feature CFs for one measurement vector.
pub fn evaluate(features: &FeatureVector) -> FeatureEvaluation {
    let feature_cfs = FeatureCfs {
        brightness: feature_cf(features, Feature::Brightness),
        contrast: feature_cf(features, Feature::Contrast),
        sharpness: feature_cf(features, Feature::Sharpness),
        noise: feature_cf(features, Feature::Noise),
        color_balance: feature_cf(features, Feature::ColorBalance),
    };
    let score = weighted_score(features);

    FeatureEvaluation {
        score,
        quality: Quality::from_score(score),
        feature_cfs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn weights_sum_to_one_and_keep_ranking() {
        let sum: f64 = Feature::ALL.iter().map(|f| f.score_weight()).sum();
        assert!(approx(sum, 1.0));
        let max = Feature::ALL
            .iter()
            .max_by(|a, b| a.score_weight().total_cmp(&b.score_weight()))
            .copied();
        let min = Feature::ALL
            .iter()
            .min_by(|a, b| a.score_weight().total_cmp(&b.score_weight()))
            .copied();
        assert_eq!(max, Some(Feature::Sharpness));
        assert_eq!(min, Some(Feature::ColorBalance));
    }

    #[test]
    fn weighted_score_is_the_fixed_order_formula() {
        for fv in [
            FeatureVector::new(0.3, 0.4, 0.5, 0.6, 0.7),
            FeatureVector::new(0.78, 0.82, 0.91, 0.12, 0.85),
            FeatureVector::new(0.22, 0.45, 0.38, 0.78, 0.41),
        ] {
            let by_hand = fv.brightness * 0.2
                + fv.contrast * 0.2
                + fv.sharpness * 0.3
                + (1.0 - fv.noise) * 0.2
                + fv.color_balance * 0.1;
            assert_eq!(weighted_score(&fv).to_bits(), by_hand.to_bits(), "{fv:?}");
        }
    }

    #[test]
    fn feature_at_threshold_gets_floor() {
        assert_eq!(score_feature(0.65, 0.65, 0.8), CF_FLOOR);
    }

    #[test]
    fn far_feature_hits_ceiling() {
        assert_eq!(score_feature(0.0, 0.75, 1.0), CF_CEILING);
        assert_eq!(score_feature(1.0, 0.0, 5.0), CF_CEILING);
    }

    #[test]
    fn distance_is_symmetric_around_threshold() {
        let above = score_feature(0.8, 0.7, 0.9);
        let below = score_feature(0.6, 0.7, 0.9);
        assert!(approx(above, below));
        assert!(approx(above, 0.79));
    }

    #[test]
    fn noise_is_inverted_before_scoring() {
        let fv = FeatureVector::new(0.0, 0.0, 0.0, 0.12, 0.0);
        // 1 - 0.12 = 0.88; |0.88 - 0.80| * 0.7 = 0.056
        assert!(approx(feature_cf(&fv, Feature::Noise), 0.756));
        assert!(approx(fv.oriented(Feature::Noise), 0.88));
    }

    #[test]
    fn studio_portrait_reference_vector() {
        let fv = FeatureVector::new(0.78, 0.82, 0.91, 0.12, 0.85);
        let ev = evaluate(&fv);
        assert!(approx(ev.score, 0.854), "score {}", ev.score);
        assert_eq!(ev.quality, Quality::Good);
        assert!(approx(ev.feature_cfs.brightness, 0.804));
        assert!(approx(ev.feature_cfs.contrast, 0.808));
        assert!(approx(ev.feature_cfs.sharpness, 0.86));
        assert!(approx(ev.feature_cfs.noise, 0.756));
        assert!(approx(ev.feature_cfs.color_balance, 0.79));
    }

    #[test]
    fn score_of_exactly_point_six_is_bad() {
        // 0.3 * 2.0 == 0.6 exactly in f64 and every other term is zero.
        let fv = FeatureVector::new(0.0, 0.0, 2.0, 1.0, 0.0);
        let ev = evaluate(&fv);
        assert_eq!(ev.score, 0.6);
        assert_eq!(ev.quality, Quality::Bad);
        assert_eq!(Quality::from_score(0.6), Quality::Bad);
        assert_eq!(Quality::from_score(0.600_000_1), Quality::Good);
    }

    #[test]
    fn low_light_shot_is_bad() {
        let fv = FeatureVector::new(0.22, 0.45, 0.38, 0.78, 0.41);
        let ev = evaluate(&fv);
        assert!(ev.score < GOOD_SCORE_THRESHOLD);
        assert_eq!(ev.quality, Quality::Bad);
    }

    #[test]
    fn out_of_range_inputs_are_accepted() {
        let fv = FeatureVector::new(1.5, -0.2, 0.9, -1.0, 3.0);
        assert!(!fv.is_normalized());
        let ev = evaluate(&fv);
        assert!(ev.score.is_finite());
        for f in Feature::ALL {
            let cf = ev.feature_cfs.get(f);
            assert!((CF_FLOOR..=CF_CEILING).contains(&cf), "{} -> {cf}", f.name());
        }
    }

    #[test]
    fn nan_measurement_yields_nan() {
        assert!(score_feature(f64::NAN, 0.7, 0.9).is_nan());
        let ev = evaluate(&FeatureVector::new(f64::NAN, 0.8, 0.8, 0.1, 0.8));
        assert!(ev.score.is_nan());
        assert!(ev.feature_cfs.brightness.is_nan());
        // NaN is never above the threshold.
        assert_eq!(ev.quality, Quality::Bad);
    }

    #[test]
    fn quality_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Quality::Good).unwrap(), "\"good\"");
        assert_eq!(serde_json::to_string(&Quality::Bad).unwrap(), "\"bad\"");
    }

    #[test]
    fn feature_vector_uses_camel_case_keys() {
        let fv: FeatureVector = serde_json::from_str(
            r#"{"brightness":0.1,"contrast":0.2,"sharpness":0.3,"noise":0.4,"colorBalance":0.5}"#,
        )
        .unwrap();
        assert_eq!(fv.color_balance, 0.5);
    }
}
