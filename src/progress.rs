use crate::app_dirs::AppDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Best score per lesson, the single input to lesson gating. Serialized as
/// `{"scores": {"l1.1": 8.5, ...}}`, the blob format any producer of this
/// store writes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Progress {
    scores: HashMap<String, f64>,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn best(&self, lesson_id: &str) -> Option<f64> {
        self.scores.get(lesson_id).copied()
    }

    /// Monotonic max-update: a new score overwrites only when strictly
    /// greater than the stored best. Returns whether anything changed, so
    /// callers can skip a pointless save.
    pub fn record(&mut self, lesson_id: &str, score: f64) -> bool {
        match self.scores.get(lesson_id) {
            Some(&best) if score <= best => false,
            _ => {
                self.scores.insert(lesson_id.to_string(), score);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

pub trait ProgressStore {
    /// Best-effort: a missing or unreadable blob is an empty map, never an
    /// error.
    fn load(&self) -> Progress;
    fn save(&self, progress: &Progress) -> io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileProgressStore {
    path: PathBuf,
}

impl FileProgressStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::progress_path()
            .unwrap_or_else(|| PathBuf::from("mathdrill_progress.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileProgressStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressStore for FileProgressStore {
    fn load(&self) -> Progress {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Progress>(&bytes) {
                Ok(progress) => return progress,
                Err(e) => log::warn!("discarding unreadable progress blob: {e}"),
            }
        }
        Progress::default()
    }

    fn save(&self, progress: &Progress) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(progress).unwrap_or_default();
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn record_is_monotonic() {
        let mut progress = Progress::new();
        assert!(progress.record("l1.1", 6.0));
        assert!(progress.record("l1.1", 9.0));
        assert!(!progress.record("l1.1", 5.0));
        assert!(!progress.record("l1.1", 9.0));
        assert_eq!(progress.best("l1.1"), Some(9.0));
    }

    #[test]
    fn lessons_are_independent() {
        let mut progress = Progress::new();
        progress.record("l1.1", 8.0);
        progress.record("l1.2", 4.5);
        assert_eq!(progress.best("l1.1"), Some(8.0));
        assert_eq!(progress.best("l1.2"), Some(4.5));
        assert_eq!(progress.best("l1.3"), None);
        assert_eq!(progress.len(), 2);
    }

    #[test]
    fn roundtrip_through_file() {
        let dir = tempdir().unwrap();
        let store = FileProgressStore::with_path(dir.path().join("progress.json"));

        let mut progress = Progress::new();
        progress.record("l1.1", 8.25);
        progress.record("l2.5", 10.0);
        store.save(&progress).unwrap();

        assert_eq!(store.load(), progress);
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = FileProgressStore::with_path(dir.path().join("absent.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("progress.json");
        std::fs::write(&path, b"{ not json").unwrap();
        let store = FileProgressStore::with_path(&path);
        assert!(store.load().is_empty());
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("state").join("progress.json");
        let store = FileProgressStore::with_path(&path);
        store.save(&Progress::new()).unwrap();
        assert!(path.exists());
    }
}
