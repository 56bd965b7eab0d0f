//! Cache backend storing one canonical JSON file per fingerprint.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::warn;
use tt_core::{from_json_slice, to_canonical_json_bytes, ErrorInfo, TimetableError};
use walkdir::WalkDir;

use crate::cache::{accept_entry, CacheEntry, ScheduleCache};
use crate::fingerprint::Fingerprint;

const ENTRY_EXTENSION: &str = "json";

fn cache_error(code: &str, message: &str, path: &Path, err: impl ToString) -> TimetableError {
    TimetableError::Cache(
        ErrorInfo::new(code, message)
            .with_context("path", path.display().to_string())
            .with_hint(err.to_string()),
    )
}

/// Directory of `<fingerprint>.json` cache entries.
///
/// Entries are written to a temporary sibling and renamed into place, so a
/// reader never observes a half-written file.
#[derive(Debug, Clone)]
pub struct DirectoryCache {
    root: PathBuf,
}

impl DirectoryCache {
    /// Opens (and creates when missing) a cache rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, TimetableError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|err| cache_error("cache-create", "failed to create cache directory", &root, err))?;
        Ok(Self { root })
    }

    /// Directory holding the entries.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the entry file for `fingerprint`.
    pub fn entry_path(&self, fingerprint: &Fingerprint) -> PathBuf {
        self.root
            .join(format!("{}.{}", fingerprint.as_str(), ENTRY_EXTENSION))
    }

    /// Fingerprints with an entry file, sorted. Files whose name is not a
    /// fingerprint are ignored.
    pub fn fingerprints(&self) -> Result<Vec<Fingerprint>, TimetableError> {
        let mut found = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|err| {
                cache_error("cache-list", "failed to list cache directory", &self.root, err)
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(ENTRY_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            if let Ok(fingerprint) = Fingerprint::from_hex(stem) {
                found.push(fingerprint);
            }
        }
        found.sort();
        Ok(found)
    }
}

impl ScheduleCache for DirectoryCache {
    fn get(&self, fingerprint: &Fingerprint) -> Result<Option<CacheEntry>, TimetableError> {
        let path = self.entry_path(fingerprint);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                warn!("treating unreadable cache entry {} as a miss: {err}", path.display());
                return Ok(None);
            }
        };
        match from_json_slice::<CacheEntry>(&bytes) {
            Ok(entry) => Ok(accept_entry(fingerprint, entry)),
            Err(err) => {
                warn!("treating malformed cache entry {} as a miss: {err}", path.display());
                Ok(None)
            }
        }
    }

    fn put(&mut self, entry: CacheEntry) -> Result<(), TimetableError> {
        let path = self.entry_path(&entry.fingerprint);
        let staging = self
            .root
            .join(format!(".{}.{}.tmp", entry.fingerprint.as_str(), ENTRY_EXTENSION));
        let bytes = to_canonical_json_bytes(&entry)?;
        fs::write(&staging, bytes)
            .map_err(|err| cache_error("cache-write", "failed to write cache entry", &staging, err))?;
        fs::rename(&staging, &path)
            .map_err(|err| cache_error("cache-rename", "failed to move cache entry into place", &path, err))
    }

    fn invalidate(&mut self, fingerprint: &Fingerprint) -> Result<bool, TimetableError> {
        let path = self.entry_path(fingerprint);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(cache_error("cache-remove", "failed to remove cache entry", &path, err)),
        }
    }

    fn clear(&mut self) -> Result<(), TimetableError> {
        for fingerprint in self.fingerprints()? {
            self.invalidate(&fingerprint)?;
        }
        Ok(())
    }
}
