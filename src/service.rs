//! # Photo Service
//! The caller of the engine: takes an upload, obtains features (from the
//! request or an extractor), assesses them and persists the record.
//!
//! Authentication is not handled here. Callers state who is asking via
//! `Viewer`; admins see every photo, users only their own.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::certainty::CfError;
use crate::engine;
use crate::extract::DynExtractor;
use crate::features::FeatureVector;
use crate::metrics;
use crate::store::{anon_hash, NewPhoto, PhotoRecord, PhotoRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

/// Caller-asserted identity used to filter listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: String,
    pub role: Role,
}

impl Viewer {
    pub fn user(id: impl Into<String>) -> Self {
        Self {
            user_id: id.into(),
            role: Role::User,
        }
    }

    pub fn admin(id: impl Into<String>) -> Self {
        Self {
            user_id: id.into(),
            role: Role::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Evaluation(#[from] CfError),
    #[error("feature extraction failed: {0}")]
    Extraction(anyhow::Error),
    #[error("photo store failed: {0}")]
    Store(anyhow::Error),
    #[error("invalid upload: {0}")]
    InvalidUpload(String),
}

/// One upload request. `features` bypasses the extractor when present.
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub owner_id: String,
    pub title: String,
    pub image_ref: String,
    pub features: Option<FeatureVector>,
}

#[derive(Clone)]
pub struct PhotoService {
    repo: Arc<dyn PhotoRepository>,
    extractor: DynExtractor,
    processing_delay: Duration,
}

impl PhotoService {
    pub fn new(repo: Arc<dyn PhotoRepository>, extractor: DynExtractor) -> Self {
        Self {
            repo,
            extractor,
            processing_delay: Duration::ZERO,
        }
    }

    /// Simulated analysis time applied before extraction.
    pub fn with_processing_delay(mut self, delay: Duration) -> Self {
        self.processing_delay = delay;
        self
    }

    /// Evaluate and store one photo.
    pub async fn upload(&self, upload: Upload) -> Result<PhotoRecord, ServiceError> {
        let Upload {
            owner_id,
            title,
            image_ref,
            features,
        } = upload;

        if owner_id.trim().is_empty() {
            return Err(ServiceError::InvalidUpload("owner id is empty".into()));
        }
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(ServiceError::InvalidUpload("title is empty".into()));
        }

        let features = match features {
            Some(f) => f,
            None => {
                if !self.processing_delay.is_zero() {
                    tokio::time::sleep(self.processing_delay).await;
                }
                self.extractor
                    .extract(&image_ref)
                    .await
                    .map_err(ServiceError::Extraction)?
            }
        };

        let result = engine::assess(&features)?;

        let record = self
            .repo
            .create(
                NewPhoto {
                    owner_id,
                    title,
                    image_ref,
                    features,
                },
                result,
            )
            .map_err(ServiceError::Store)?;
        metrics::record_upload();
        metrics::record_evaluation(&record.result);

        info!(
            target: "photo",
            id = %record.id,
            owner = %anon_hash(&record.owner_id),
            quality = record.result.quality.as_str(),
            score = record.result.score,
            cf = record.result.certainty_factor,
            "photo evaluated"
        );
        Ok(record)
    }

    /// Photos visible to `viewer`, newest first.
    pub fn visible_photos(&self, viewer: &Viewer) -> Result<Vec<PhotoRecord>, ServiceError> {
        let rows = if viewer.is_admin() {
            self.repo.list_all()
        } else {
            self.repo.list_by_owner(&viewer.user_id)
        }
        .map_err(ServiceError::Store)?;
        debug!(
            target: "photo",
            viewer = %anon_hash(&viewer.user_id),
            admin = viewer.is_admin(),
            count = rows.len(),
            "listed photos"
        );
        Ok(rows)
    }

    pub fn photo(&self, id: &str) -> Result<Option<PhotoRecord>, ServiceError> {
        self.repo.get_by_id(id).map_err(ServiceError::Store)
    }
}
