//! Cache module for loaded content
//!
//! Each section's records are loaded once and shared read-only between
//! requests as an `Arc<[ContentRecord]>`. A fingerprint of the section
//! directory (file paths, sizes and modification times) is taken on every
//! lookup; when it differs from the cached one the section is reloaded.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::SystemTime;
use walkdir::WalkDir;

use crate::content::{ContentError, ContentRecord, ContentRepository};

/// Records of one section as of a given directory fingerprint
#[derive(Debug, Clone)]
struct CachedSection {
    fingerprint: u64,
    records: Arc<[ContentRecord]>,
}

/// Process-wide cache of loaded sections, keyed by content directory
#[derive(Debug, Default)]
pub struct ContentCache {
    sections: RwLock<HashMap<PathBuf, CachedSection>>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached records for `repo`, loading them if absent or stale
    pub fn get_or_load(
        &self,
        repo: &ContentRepository,
    ) -> Result<Arc<[ContentRecord]>, ContentError> {
        let fingerprint = fingerprint_dir(repo.dir());

        {
            let sections = self.sections.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(cached) = sections.get(repo.dir()) {
                if cached.fingerprint == fingerprint {
                    return Ok(Arc::clone(&cached.records));
                }
                tracing::info!("Content changed in {:?}, reloading", repo.dir());
            }
        }

        let records: Arc<[ContentRecord]> = repo.load()?.into();
        let mut sections = self
            .sections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        sections.insert(
            repo.dir().to_path_buf(),
            CachedSection {
                fingerprint,
                records: Arc::clone(&records),
            },
        );
        Ok(records)
    }

    /// Drop the cached records of one directory
    pub fn invalidate(&self, dir: &Path) {
        self.sections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(dir);
    }

    /// Number of cached sections
    pub fn len(&self) -> usize {
        self.sections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Calculate a fingerprint for a content directory
pub fn fingerprint_dir(dir: &Path) -> u64 {
    let mut hasher = DefaultHasher::new();

    // WalkDir sorted by name keeps the ordering deterministic
    for entry in WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        entry.path().hash(&mut hasher);
        if let Ok(meta) = entry.metadata() {
            meta.len().hash(&mut hasher);
            meta.modified()
                .ok()
                .and_then(|t| t.duration_since(SystemTime::UNIX_EPOCH).ok())
                .map(|d| d.as_nanos())
                .hash(&mut hasher);
        }
    }

    hasher.finish()
}
