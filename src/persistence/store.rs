use chrono::{DateTime, SecondsFormat, Utc};
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::persistence::SnapshotError;
use crate::persistence::snapshot::{Snapshot, SnapshotDraft};

/// Storage for named snapshots. `save` assigns the id and creation time.
pub trait SnapshotStore {
    fn save(&mut self, draft: SnapshotDraft) -> Result<Snapshot, SnapshotError>;

    /// Every stored snapshot, newest first.
    fn list(&self) -> Result<Vec<Snapshot>, SnapshotError>;

    fn load(&self, id: &str) -> Result<Option<Snapshot>, SnapshotError>;

    /// Deleting an unknown id is not an error.
    fn delete(&mut self, id: &str) -> Result<(), SnapshotError>;

    fn rename(&mut self, id: &str, name: &str) -> Result<Snapshot, SnapshotError>;

    fn latest(&self) -> Result<Option<Snapshot>, SnapshotError> {
        Ok(self.list()?.into_iter().next())
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Newest first. Unparseable timestamps sort last; ties fall back to id.
fn newest_first(a: &Snapshot, b: &Snapshot) -> Ordering {
    let (ta, tb) = (parse_timestamp(&a.created_at), parse_timestamp(&b.created_at));
    match (ta, tb) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.id.cmp(&b.id))
}

/// Snapshots kept in memory. Useful for tests and headless sessions.
#[derive(Debug, Default, Clone)]
pub struct MemorySnapshotStore {
    snapshots: Vec<Snapshot>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn save(&mut self, draft: SnapshotDraft) -> Result<Snapshot, SnapshotError> {
        let snapshot = draft.into_snapshot(new_id(), timestamp_now());
        self.snapshots.push(snapshot.clone());
        Ok(snapshot)
    }

    fn list(&self) -> Result<Vec<Snapshot>, SnapshotError> {
        // Later inserts win ties so that saves within one millisecond still
        // list newest first.
        let mut listed: Vec<Snapshot> = self.snapshots.iter().rev().cloned().collect();
        listed.sort_by_key(|s| std::cmp::Reverse(parse_timestamp(&s.created_at)));
        Ok(listed)
    }

    fn load(&self, id: &str) -> Result<Option<Snapshot>, SnapshotError> {
        Ok(self.snapshots.iter().find(|s| s.id == id).cloned())
    }

    fn delete(&mut self, id: &str) -> Result<(), SnapshotError> {
        self.snapshots.retain(|s| s.id != id);
        Ok(())
    }

    fn rename(&mut self, id: &str, name: &str) -> Result<Snapshot, SnapshotError> {
        let snapshot = self
            .snapshots
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| SnapshotError::NotFound(id.to_string()))?;
        snapshot.name = name.to_string();
        Ok(snapshot.clone())
    }
}

/// One pretty-printed `<id>.json` file per snapshot in a directory.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    fn read(&self, path: &Path) -> Result<Snapshot, SnapshotError> {
        let content = fs::read_to_string(path)?;
        let mut snapshot: Snapshot =
            serde_json::from_str(&content).map_err(|source| SnapshotError::Decode {
                path: path.to_path_buf(),
                source,
            })?;
        if snapshot.id.is_empty() {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                snapshot.id = stem.to_string();
            }
        }
        Ok(snapshot)
    }

    /// Write a snapshot to a temp file, then atomically rename it into place
    /// so a partial write never replaces an existing file.
    fn write(&self, snapshot: &Snapshot) -> Result<PathBuf, SnapshotError> {
        fs::create_dir_all(&self.dir)?;

        let target = self.path_for(&snapshot.id);
        let tmp = self.dir.join(format!(".{}.json.tmp", snapshot.id));
        let encoded = serde_json::to_string_pretty(snapshot)?;

        if let Err(e) = fs::write(&tmp, encoded) {
            let _ = fs::remove_file(&tmp);
            return Err(SnapshotError::Io(e));
        }
        if let Err(e) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            return Err(SnapshotError::Io(e));
        }
        Ok(target)
    }

    /// Keep the `keep` newest snapshots and delete the rest. Returns the
    /// deleted ids.
    pub fn prune(&mut self, keep: usize) -> Result<Vec<String>, SnapshotError> {
        let snapshots = self.list()?;
        let mut deleted = Vec::new();
        for snapshot in snapshots.iter().skip(keep) {
            fs::remove_file(self.path_for(&snapshot.id))?;
            deleted.push(snapshot.id.clone());
        }
        if !deleted.is_empty() {
            debug!(count = deleted.len(), keep, "Pruned snapshots");
        }
        Ok(deleted)
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn save(&mut self, draft: SnapshotDraft) -> Result<Snapshot, SnapshotError> {
        let snapshot = draft.into_snapshot(new_id(), timestamp_now());
        let path = self.write(&snapshot)?;
        debug!(id = %snapshot.id, path = %path.display(), "Saved snapshot");
        Ok(snapshot)
    }

    fn list(&self) -> Result<Vec<Snapshot>, SnapshotError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut snapshots = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            // Skip temp files
            if filename.starts_with('.') || !filename.ends_with(".json") {
                continue;
            }
            match self.read(&path) {
                Ok(snapshot) => snapshots.push(snapshot),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Unreadable snapshot, skipping");
                }
            }
        }

        snapshots.sort_by(newest_first);
        Ok(snapshots)
    }

    fn load(&self, id: &str) -> Result<Option<Snapshot>, SnapshotError> {
        let path = self.path_for(id);
        if !path.is_file() {
            return Ok(None);
        }
        self.read(&path).map(Some)
    }

    fn delete(&mut self, id: &str) -> Result<(), SnapshotError> {
        match fs::remove_file(self.path_for(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SnapshotError::Io(e)),
        }
    }

    fn rename(&mut self, id: &str, name: &str) -> Result<Snapshot, SnapshotError> {
        let mut snapshot = self
            .load(id)?
            .ok_or_else(|| SnapshotError::NotFound(id.to_string()))?;
        snapshot.name = name.to_string();
        self.write(&snapshot)?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::grid::GridConfig;
    use crate::persistence::snapshot::capture;
    use crate::world::grid::Grid;
    use crate::world::tile::Terrain;
    use tempfile::TempDir;

    fn draft(name: &str) -> SnapshotDraft {
        let mut grid = Grid::build(GridConfig::new(1.0, 4, 4, 0.2), Some(1));
        grid.set_terrain(2, Terrain::Mountain);
        capture(&grid, name)
    }

    fn stored(id: &str, created_at: &str) -> Snapshot {
        draft(id).into_snapshot(id.to_string(), created_at.to_string())
    }

    fn write_raw(dir: &Path, snapshot: &Snapshot) {
        let json = serde_json::to_string(snapshot).unwrap();
        fs::write(dir.join(format!("{}.json", snapshot.id)), json).unwrap();
    }

    #[test]
    fn save_assigns_id_and_timestamp() {
        let dir = TempDir::new().unwrap();
        let mut store = FileSnapshotStore::new(dir.path());
        let saved = store.save(draft("first")).unwrap();

        assert!(Uuid::parse_str(&saved.id).is_ok());
        assert!(parse_timestamp(&saved.created_at).is_some());
        assert!(dir.path().join(format!("{}.json", saved.id)).is_file());

        let loaded = store.load(&saved.id).unwrap().unwrap();
        assert_eq!(loaded, saved);
    }

    #[test]
    fn no_temp_files_left_after_save() {
        let dir = TempDir::new().unwrap();
        let mut store = FileSnapshotStore::new(dir.path());
        store.save(draft("a")).unwrap();
        let leftovers = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with('.'))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn list_is_newest_first() {
        let dir = TempDir::new().unwrap();
        write_raw(dir.path(), &stored("old", "2024-01-01T00:00:00Z"));
        write_raw(dir.path(), &stored("new", "2025-06-01T12:00:00+02:00"));
        write_raw(dir.path(), &stored("mid", "2024-09-15T08:30:00.250Z"));

        let store = FileSnapshotStore::new(dir.path());
        let ids: Vec<String> = store.list().unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
        assert_eq!(store.latest().unwrap().unwrap().id, "new");
    }

    #[test]
    fn corrupt_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        write_raw(dir.path(), &stored("good", "2024-01-01T00:00:00Z"));
        fs::write(dir.path().join("bad.json"), "{ not json").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        fs::write(dir.path().join(".half.json.tmp"), "{").unwrap();

        let store = FileSnapshotStore::new(dir.path());
        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "good");
        assert!(matches!(store.load("bad"), Err(SnapshotError::Decode { .. })));
    }

    #[test]
    fn missing_directory_lists_nothing() {
        let store = FileSnapshotStore::new("/nonexistent/worldpaint-snapshots");
        assert!(store.list().unwrap().is_empty());
        assert!(store.latest().unwrap().is_none());
        assert!(store.load("anything").unwrap().is_none());
    }

    #[test]
    fn prune_keeps_newest() {
        let dir = TempDir::new().unwrap();
        for (id, ts) in [
            ("a", "2024-01-01T00:00:00Z"),
            ("b", "2024-01-02T00:00:00Z"),
            ("c", "2024-01-03T00:00:00Z"),
            ("d", "2024-01-04T00:00:00Z"),
        ] {
            write_raw(dir.path(), &stored(id, ts));
        }
        let mut store = FileSnapshotStore::new(dir.path());
        let deleted = store.prune(2).unwrap();
        assert_eq!(deleted, vec!["b", "a"]);
        let ids: Vec<String> = store.list().unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["d", "c"]);
        assert!(store.prune(5).unwrap().is_empty());
    }

    #[test]
    fn rename_and_delete() {
        let dir = TempDir::new().unwrap();
        let mut store = FileSnapshotStore::new(dir.path());
        let saved = store.save(draft("before")).unwrap();

        let renamed = store.rename(&saved.id, "after").unwrap();
        assert_eq!(renamed.name, "after");
        assert_eq!(renamed.created_at, saved.created_at);
        assert_eq!(store.load(&saved.id).unwrap().unwrap().name, "after");

        store.delete(&saved.id).unwrap();
        assert!(store.load(&saved.id).unwrap().is_none());
        store.delete(&saved.id).unwrap();
        assert!(matches!(
            store.rename(&saved.id, "gone"),
            Err(SnapshotError::NotFound(_))
        ));
    }

    #[test]
    fn memory_store_contract() {
        let mut store = MemorySnapshotStore::new();
        let first = store.save(draft("one")).unwrap();
        let second = store.save(draft("two")).unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(store.len(), 2);

        assert_eq!(store.latest().unwrap().unwrap().id, second.id);
        assert_eq!(store.load(&first.id).unwrap().unwrap().name, "one");
        assert_eq!(store.rename(&first.id, "uno").unwrap().name, "uno");

        store.delete(&second.id).unwrap();
        let names: Vec<String> = store.list().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["uno"]);
        assert!(store.load(&second.id).unwrap().is_none());
    }
}
