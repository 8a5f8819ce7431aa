//! store.rs: photo records and the repository the upload path writes to.
//!
//! The engine itself holds no state; persistence lives behind `PhotoRepository`
//! so callers can swap the in-memory store for a database.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::evaluation::EvaluationResult;
use crate::features::FeatureVector;

/// A stored photo plus its evaluation. The result is flattened so the JSON
/// carries `score`, `quality`, `featureCFs` and `certaintyFactor` at top level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    /// URL or storage key of the image; never the pixels.
    pub image_ref: String,
    pub uploaded_at: DateTime<Utc>,
    pub features: FeatureVector,
    #[serde(flatten)]
    pub result: EvaluationResult,
}

/// What the caller knows about a photo before it is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPhoto {
    pub owner_id: String,
    pub title: String,
    pub image_ref: String,
    pub features: FeatureVector,
}

pub trait PhotoRepository: Send + Sync {
    /// Store `photo` with its evaluation and return the created record.
    fn create(&self, photo: NewPhoto, result: EvaluationResult) -> Result<PhotoRecord>;
    /// Photos of one owner, newest first.
    fn list_by_owner(&self, owner_id: &str) -> Result<Vec<PhotoRecord>>;
    /// Every photo, newest first.
    fn list_all(&self) -> Result<Vec<PhotoRecord>>;
    fn get_by_id(&self, id: &str) -> Result<Option<PhotoRecord>>;
}

/// Bounded in-memory repository. New records go to the front; when full the
/// oldest record is dropped.
#[derive(Debug)]
pub struct InMemoryPhotoStore {
    inner: Mutex<VecDeque<PhotoRecord>>,
    cap: usize,
    seq: AtomicU64,
}

impl InMemoryPhotoStore {
    pub fn with_capacity(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            inner: Mutex::new(VecDeque::with_capacity(cap.min(1024))),
            cap,
            seq: AtomicU64::new(0),
        }
    }

    /// Insert a fully formed record (used for seeding). Replaces a record with
    /// the same id.
    pub fn insert_record(&self, record: PhotoRecord) -> Result<()> {
        let mut v = self.lock()?;
        v.retain(|r| r.id != record.id);
        v.push_front(record);
        v.truncate(self.cap);
        Ok(())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, VecDeque<PhotoRecord>>> {
        self.inner
            .lock()
            .map_err(|_| anyhow!("photo store mutex poisoned"))
    }

    fn next_id(&self, photo: &NewPhoto, at: DateTime<Utc>) -> String {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let mut hasher = Sha256::new();
        hasher.update(photo.owner_id.as_bytes());
        hasher.update([0u8]);
        hasher.update(photo.title.as_bytes());
        hasher.update([0u8]);
        hasher.update(at.timestamp_nanos_opt().unwrap_or_default().to_le_bytes());
        hasher.update(seq.to_le_bytes());
        short_hex(&hasher.finalize())
    }
}

impl Default for InMemoryPhotoStore {
    fn default() -> Self {
        Self::with_capacity(2000)
    }
}

impl PhotoRepository for InMemoryPhotoStore {
    fn create(&self, photo: NewPhoto, result: EvaluationResult) -> Result<PhotoRecord> {
        let uploaded_at = Utc::now();
        let record = PhotoRecord {
            id: self.next_id(&photo, uploaded_at),
            owner_id: photo.owner_id,
            title: photo.title,
            image_ref: photo.image_ref,
            uploaded_at,
            features: photo.features,
            result,
        };
        let mut v = self.lock()?;
        v.push_front(record.clone());
        v.truncate(self.cap);
        Ok(record)
    }

    fn list_by_owner(&self, owner_id: &str) -> Result<Vec<PhotoRecord>> {
        let v = self.lock()?;
        Ok(v.iter().filter(|r| r.owner_id == owner_id).cloned().collect())
    }

    fn list_all(&self) -> Result<Vec<PhotoRecord>> {
        let v = self.lock()?;
        Ok(v.iter().cloned().collect())
    }

    fn get_by_id(&self, id: &str) -> Result<Option<PhotoRecord>> {
        let v = self.lock()?;
        Ok(v.iter().find(|r| r.id == id).cloned())
    }
}

/// First 6 bytes of a digest as 12 lowercase hex chars.
pub(crate) fn short_hex(digest: &[u8]) -> String {
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Anonymized id for logs: never log raw owner ids.
pub(crate) fn anon_hash(text: &str) -> String {
    short_hex(&Sha256::digest(text.as_bytes()))
}
