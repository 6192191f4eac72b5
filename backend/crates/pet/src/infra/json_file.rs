//! JSON File Repository
//!
//! All mood records live in one JSON object keyed by identity:
//!
//! ```json
//! { "279058397": { "happiness": 77, "lastInteraction": 1700000000.0 } }
//! ```
//!
//! The whole map is held in memory behind a `RwLock`. Every update rewrites
//! the file through a sibling temp file and a rename while the write lock is
//! still held, so snapshots reach the disk in commit order and a crash never
//! leaves a half-written document behind.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::entities::MoodRecord;
use crate::domain::repository::MoodRepository;
use crate::domain::value_objects::UserIdentity;
use crate::error::PetResult;

type MoodMap = HashMap<String, MoodRecord>;

/// File-backed mood repository
#[derive(Clone)]
pub struct JsonFileMoodRepository {
    inner: Arc<Inner>,
}

struct Inner {
    /// `None` keeps everything in memory
    path: Option<PathBuf>,
    records: RwLock<MoodMap>,
}

impl JsonFileMoodRepository {
    /// Open (or start) the store at `path`
    ///
    /// A missing or empty file is an empty store. A file that cannot be
    /// read or parsed also starts the store empty; a parse failure first
    /// copies the file aside to `<file>.corrupt` since the next write
    /// replaces it.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = load_records(&path).await;

        tracing::info!(
            path = %path.display(),
            records = records.len(),
            "Mood store opened"
        );

        Self {
            inner: Arc::new(Inner {
                path: Some(path),
                records: RwLock::new(records),
            }),
        }
    }

    /// Store that never touches the filesystem
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(Inner {
                path: None,
                records: RwLock::new(MoodMap::new()),
            }),
        }
    }

    /// Number of identities with a stored record
    pub async fn len(&self) -> usize {
        self.inner.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.records.read().await.is_empty()
    }
}

impl MoodRepository for JsonFileMoodRepository {
    async fn find(&self, identity: &UserIdentity) -> PetResult<Option<MoodRecord>> {
        let records = self.inner.records.read().await;
        Ok(records.get(identity.as_str()).copied())
    }

    async fn update<F>(&self, identity: &UserIdentity, f: F) -> PetResult<MoodRecord>
    where
        F: FnOnce(Option<MoodRecord>) -> MoodRecord + Send,
    {
        let mut records = self.inner.records.write().await;

        let current = records.get(identity.as_str()).copied();
        let next = f(current);
        records.insert(identity.as_str().to_string(), next);

        if let Some(path) = self.inner.path.as_deref() {
            // The in-memory commit stands; the next successful write carries
            // this record along with the rest of the snapshot.
            if let Err(e) = persist_records(path, &records).await {
                tracing::error!(
                    path = %path.display(),
                    error = %e,
                    "Failed to persist mood store"
                );
            }
        }

        Ok(next)
    }
}

async fn load_records(path: &Path) -> MoodMap {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return MoodMap::new(),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Mood store unreadable; starting empty"
            );
            return MoodMap::new();
        }
    };

    if raw.trim().is_empty() {
        return MoodMap::new();
    }

    match serde_json::from_str::<MoodMap>(&raw) {
        Ok(records) => records,
        Err(e) => {
            let quarantine = sibling(path, "corrupt");
            tracing::warn!(
                path = %path.display(),
                quarantine = %quarantine.display(),
                error = %e,
                "Mood store unparseable; starting empty"
            );
            if let Err(copy_err) = tokio::fs::copy(path, &quarantine).await {
                tracing::warn!(
                    error = %copy_err,
                    "Failed to keep a copy of the unparseable mood store"
                );
            }
            MoodMap::new()
        }
    }
}

async fn persist_records(path: &Path, records: &MoodMap) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let payload = serde_json::to_vec_pretty(records)?;

    let temp_path = sibling(path, "tmp");
    tokio::fs::write(&temp_path, payload).await?;
    tokio::fs::rename(&temp_path, path).await?;

    Ok(())
}

/// `state.json` -> `state.json.<suffix>`
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}
