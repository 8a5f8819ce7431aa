// src/demo.rs
//! Sample studio photos for local runs and UI demos.
//!
//! Measurements come from the studio gallery fixtures; score, verdict and CFs are
//! recomputed by the engine so seeded records never disagree with `assess`.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::engine;
use crate::features::FeatureVector;
use crate::store::{InMemoryPhotoStore, PhotoRecord};

pub const DEMO_OWNER_ID: &str = "2";

struct Sample {
    id: &'static str,
    title: &'static str,
    image_ref: &'static str,
    uploaded_at: &'static str,
    features: [f64; 5],
}

// Oldest first, so the newest ends up at the front of the store.
const SAMPLES: [Sample; 3] = [
    Sample {
        id: "3",
        title: "Low Light Portrait",
        image_ref: "https://images.unsplash.com/photo-1521119989659-a83eee488004?w=800&auto=format&fit=crop",
        uploaded_at: "2023-09-05T18:45:00Z",
        features: [0.22, 0.45, 0.38, 0.78, 0.41],
    },
    Sample {
        id: "2",
        title: "Studio Portrait 2",
        image_ref: "https://images.unsplash.com/photo-1494790108377-be9c29b29330?w=800&auto=format&fit=crop",
        uploaded_at: "2023-09-10T10:15:00Z",
        features: [0.85, 0.89, 0.94, 0.08, 0.91],
    },
    Sample {
        id: "1",
        title: "Studio Portrait 1",
        image_ref: "https://images.unsplash.com/photo-1545224144-b38cd309ef69?w=800&auto=format&fit=crop",
        uploaded_at: "2023-09-12T15:30:00Z",
        features: [0.78, 0.82, 0.91, 0.12, 0.85],
    },
];

/// Build the three sample records, newest first.
pub fn demo_records() -> Result<Vec<PhotoRecord>> {
    let mut out = Vec::with_capacity(SAMPLES.len());
    for s in SAMPLES.iter().rev() {
        let [b, c, sh, n, cb] = s.features;
        let features = FeatureVector::new(b, c, sh, n, cb);
        let result = engine::assess(&features)
            .with_context(|| format!("evaluating demo photo {}", s.id))?;
        let uploaded_at = DateTime::parse_from_rfc3339(s.uploaded_at)
            .with_context(|| format!("parsing demo timestamp {}", s.uploaded_at))?
            .with_timezone(&Utc);
        out.push(PhotoRecord {
            id: s.id.to_string(),
            owner_id: DEMO_OWNER_ID.to_string(),
            title: s.title.to_string(),
            image_ref: s.image_ref.to_string(),
            uploaded_at,
            features,
            result,
        });
    }
    Ok(out)
}

/// Insert the sample records into `store`.
pub fn seed(store: &InMemoryPhotoStore) -> Result<usize> {
    let mut records = demo_records()?;
    // insert_record pushes to the front: go oldest → newest
    records.reverse();
    let n = records.len();
    for r in records {
        store.insert_record(r)?;
    }
    Ok(n)
}
