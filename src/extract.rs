// src/extract.rs
//! Upstream feature producers. The engine never generates features itself;
//! the upload path asks a `FeatureExtractor` when a request carries none.
//!
//! There is no computer-vision pipeline here: `RandomExtractor` reproduces the
//! placeholder ranges of the web demo and `FixedExtractor` returns a given vector.

use anyhow::{anyhow, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::{Arc, Mutex};

use crate::config::ExtractorKind;
use crate::features::{Feature, FeatureVector};

#[async_trait::async_trait]
pub trait FeatureExtractor: Send + Sync {
    /// Produce features for the image behind `image_ref` (URL or storage key).
    async fn extract(&self, image_ref: &str) -> Result<FeatureVector>;
    fn name(&self) -> &'static str;
}

pub type DynExtractor = Arc<dyn FeatureExtractor>;

/// Build the extractor selected in the service config.
pub fn build_extractor(kind: ExtractorKind) -> DynExtractor {
    match kind {
        ExtractorKind::Random => Arc::new(RandomExtractor::from_os_rng()),
        ExtractorKind::Neutral => Arc::new(FixedExtractor::neutral()),
    }
}

/// Uniform draws in the demo ranges:
/// brightness 0.5–0.8, contrast 0.5–0.8, sharpness 0.5–0.9, noise 0–0.5, colorBalance 0.6–0.9.
#[derive(Debug)]
pub struct RandomExtractor {
    rng: Mutex<StdRng>,
}

impl RandomExtractor {
    pub fn from_os_rng() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Reproducible sequence, for tests and demos.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn draw(&self) -> Result<FeatureVector> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| anyhow!("random extractor mutex poisoned"))?;
        Ok(FeatureVector {
            brightness: rng.random_range(0.5..0.8),
            contrast: rng.random_range(0.5..0.8),
            sharpness: rng.random_range(0.5..0.9),
            noise: rng.random_range(0.0..0.5),
            color_balance: rng.random_range(0.6..0.9),
        })
    }
}

#[async_trait::async_trait]
impl FeatureExtractor for RandomExtractor {
    async fn extract(&self, _image_ref: &str) -> Result<FeatureVector> {
        self.draw()
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Always returns the same vector.
#[derive(Debug, Clone, Copy)]
pub struct FixedExtractor {
    features: FeatureVector,
}

impl FixedExtractor {
    pub fn new(features: FeatureVector) -> Self {
        Self { features }
    }

    /// Each feature exactly on its threshold (noise stored un-inverted).
    pub fn neutral() -> Self {
        let t = |f: Feature| f.threshold().threshold;
        Self::new(FeatureVector {
            brightness: t(Feature::Brightness),
            contrast: t(Feature::Contrast),
            sharpness: t(Feature::Sharpness),
            noise: 1.0 - t(Feature::Noise),
            color_balance: t(Feature::ColorBalance),
        })
    }
}

#[async_trait::async_trait]
impl FeatureExtractor for FixedExtractor {
    async fn extract(&self, _image_ref: &str) -> Result<FeatureVector> {
        Ok(self.features)
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}
