//! core::stash::metadata
//!
//! The tracked set stored in each stash's `.stash.json`.
//!
//! # Schema
//!
//! ```json
//! { "tracked": { "waybar": "/home/u/.config/waybar" } }
//! ```
//!
//! Older stashes may carry `"tracked": ["/home/u/.config/waybar"]`; that
//! form is read by keying each path on its final segment and is written
//! back in map form on the next save. A stash directory without a
//! metadata file reads as an empty set.

use std::path::{Component, Path, PathBuf};

use serde_json::{json, Map, Value};
use tracing::warn;

use crate::core::atomic;
use crate::core::errors::{Result, StashError};
use crate::core::paths::is_internal_entry;
use crate::core::registry::absolutize;
use crate::core::types::{key_for_path, looks_like_path};

/// One tracked entry: the filename inside the stash and its source path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedEntry {
    /// Name of the copy inside the stash directory.
    pub filename: String,
    /// Absolute source path.
    pub path: PathBuf,
}

/// Result of inserting into a tracked set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The entry was added.
    Inserted,
    /// The same source path was already tracked under this entry.
    AlreadyTracked(TrackedEntry),
}

/// Ordered `filename -> source path` mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackedSet {
    entries: Vec<TrackedEntry>,
}

impl TrackedSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the set from a metadata file.
    ///
    /// # Errors
    ///
    /// Returns `StashError::Metadata` if the file exists but is not valid
    /// metadata. Unlike the registry, a broken tracked set is not silently
    /// discarded, since the next save would lose every entry.
    pub fn load(path: &Path) -> Result<Self> {
        let Some(contents) = atomic::read_optional(path)? else {
            return Ok(Self::new());
        };
        Self::parse(&contents).map_err(|message| StashError::Metadata {
            path: path.to_path_buf(),
            message,
        })
    }

    fn parse(contents: &str) -> std::result::Result<Self, String> {
        if contents.trim().is_empty() {
            return Ok(Self::new());
        }

        let root: Value = serde_json::from_str(contents).map_err(|e| e.to_string())?;
        let tracked = match root {
            Value::Object(mut obj) => obj.remove("tracked").unwrap_or(Value::Null),
            _ => return Err("expected a JSON object".to_string()),
        };

        let mut set = Self::new();
        match tracked {
            Value::Null => {}
            Value::Object(map) => {
                for (filename, value) in map {
                    let path = value
                        .as_str()
                        .ok_or_else(|| format!("tracked entry '{}' is not a string", filename))?;
                    check_stored_filename(&filename)?;
                    set.entries.push(TrackedEntry {
                        filename,
                        path: PathBuf::from(path),
                    });
                }
            }
            Value::Array(items) => {
                for item in items {
                    let path = item
                        .as_str()
                        .map(PathBuf::from)
                        .ok_or_else(|| "tracked list item is not a string".to_string())?;
                    let filename = key_for_path(&path).ok_or_else(|| {
                        format!("tracked path '{}' has no final segment", path.display())
                    })?;
                    check_stored_filename(&filename)?;
                    if set.get(&filename).is_some() {
                        warn!(
                            filename = %filename,
                            path = %path.display(),
                            "dropping legacy tracked path that reuses a filename"
                        );
                        continue;
                    }
                    set.entries.push(TrackedEntry { filename, path });
                }
            }
            _ => return Err("'tracked' must be an object".to_string()),
        }
        Ok(set)
    }

    /// Write the set to a metadata file atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|e| {
                (
                    e.filename.clone(),
                    Value::String(e.path.to_string_lossy().into_owned()),
                )
            })
            .collect();
        atomic::write_json(path, &json!({ "tracked": map }))
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[TrackedEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by filename.
    pub fn get(&self, filename: &str) -> Option<&TrackedEntry> {
        self.entries.iter().find(|e| e.filename == filename)
    }

    /// Look up an entry by source path.
    pub fn find_path(&self, path: &Path) -> Option<&TrackedEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    /// Track `path` under its final segment.
    ///
    /// # Errors
    ///
    /// - `InvalidName` if the path has no final segment, or its final
    ///   segment is one of Stasher's own files
    /// - `AlreadyExists` if a different path already uses that filename
    pub fn insert(&mut self, path: PathBuf) -> Result<InsertOutcome> {
        if let Some(existing) = self.find_path(&path) {
            return Ok(InsertOutcome::AlreadyTracked(existing.clone()));
        }

        let filename = key_for_path(&path).ok_or_else(|| StashError::InvalidName {
            name: path.display().to_string(),
            reason: "path has no final segment to use as a filename".to_string(),
        })?;
        if is_internal_entry(&filename) {
            return Err(StashError::InvalidName {
                name: filename,
                reason: "name is reserved for stash metadata".to_string(),
            });
        }
        if self.get(&filename).is_some() {
            return Err(StashError::AlreadyExists(filename));
        }

        self.entries.push(TrackedEntry { filename, path });
        Ok(InsertOutcome::Inserted)
    }

    /// Remove the entry whose filename or source path matches `arg`.
    ///
    /// The key is tried first; arguments that look like paths are also
    /// compared against the normalized source paths.
    pub fn remove(&mut self, arg: &str) -> Result<Option<TrackedEntry>> {
        let index = match self.entries.iter().position(|e| e.filename == arg) {
            Some(index) => Some(index),
            None if looks_like_path(arg) => {
                let path = absolutize(Path::new(arg))?;
                self.entries.iter().position(|e| e.path == path)
            }
            None => None,
        };
        Ok(index.map(|i| self.entries.remove(i)))
    }
}

/// A stored filename must name a direct child of the stash directory.
fn check_stored_filename(filename: &str) -> std::result::Result<(), String> {
    let mut components = Path::new(filename).components();
    let single = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(name)), None) if name == filename
    );
    if !single {
        return Err(format!("tracked filename '{}' is not a plain name", filename));
    }
    if is_internal_entry(filename) {
        return Err(format!("tracked filename '{}' is reserved", filename));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let set = TrackedSet::load(&temp.path().join(".stash.json")).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn save_and_load_keep_order() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".stash.json");

        let mut set = TrackedSet::new();
        set.insert(PathBuf::from("/home/u/.config/waybar")).unwrap();
        set.insert(PathBuf::from("/home/u/.config/hypr")).unwrap();
        set.save(&path).unwrap();

        let loaded = TrackedSet::load(&path).unwrap();
        assert_eq!(loaded, set);
        let names: Vec<_> = loaded.entries().iter().map(|e| e.filename.as_str()).collect();
        assert_eq!(names, vec!["waybar", "hypr"]);
    }

    #[test]
    fn written_format() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".stash.json");
        let mut set = TrackedSet::new();
        set.insert(PathBuf::from("/home/u/.config/kitty")).unwrap();
        set.save(&path).unwrap();

        let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            value,
            json!({"tracked": {"kitty": "/home/u/.config/kitty"}})
        );
    }

    #[test]
    fn legacy_list_form_is_read() {
        let set = TrackedSet::parse(r#"{"tracked": ["/home/u/.config/waybar"]}"#).unwrap();
        assert_eq!(
            set.get("waybar").map(|e| e.path.clone()),
            Some(PathBuf::from("/home/u/.config/waybar"))
        );
    }

    #[test]
    fn garbage_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".stash.json");
        fs::write(&path, "[1, 2").unwrap();

        let err = TrackedSet::load(&path).unwrap_err();
        assert!(matches!(err, StashError::Metadata { .. }));
    }

    #[test]
    fn insert_same_path_twice_is_reported() {
        let mut set = TrackedSet::new();
        let path = PathBuf::from("/home/u/.config/waybar");

        assert_eq!(set.insert(path.clone()).unwrap(), InsertOutcome::Inserted);
        assert!(matches!(
            set.insert(path).unwrap(),
            InsertOutcome::AlreadyTracked(_)
        ));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn insert_filename_collision_fails() {
        let mut set = TrackedSet::new();
        set.insert(PathBuf::from("/home/u/.config/nvim")).unwrap();

        let err = set.insert(PathBuf::from("/etc/nvim")).unwrap_err();
        assert!(matches!(err, StashError::AlreadyExists(ref n) if n == "nvim"));
    }

    #[test]
    fn insert_rejects_reserved_filenames() {
        let mut set = TrackedSet::new();
        for path in [
            "/home/u/proj/.stash.json",
            "/home/u/proj/.stash.json.tmp",
            "/home/u/proj/.stash-staging-waybar",
        ] {
            let err = set.insert(PathBuf::from(path)).unwrap_err();
            assert!(matches!(err, StashError::InvalidName { .. }), "{} accepted", path);
        }
        assert!(set.is_empty());
    }

    #[test]
    fn stored_filenames_must_stay_inside_the_stash() {
        for contents in [
            r#"{"tracked": {"/home/u": "/tmp/x"}}"#,
            r#"{"tracked": {"../../x": "/tmp/x"}}"#,
            r#"{"tracked": {"a/b": "/tmp/x"}}"#,
            r#"{"tracked": {"..": "/tmp/x"}}"#,
            r#"{"tracked": {"": "/tmp/x"}}"#,
            r#"{"tracked": {".stash.json": "/tmp/.stash.json"}}"#,
            r#"{"tracked": ["/home/u/proj/.stash.json"]}"#,
        ] {
            assert!(TrackedSet::parse(contents).is_err(), "{} accepted", contents);
        }
    }

    #[test]
    fn unsafe_filename_on_disk_is_a_metadata_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".stash.json");
        fs::write(&path, r#"{"tracked": {"../../x": "/tmp/x"}}"#).unwrap();

        let err = TrackedSet::load(&path).unwrap_err();
        assert!(matches!(err, StashError::Metadata { .. }));
    }

    #[test]
    fn legacy_list_keeps_first_of_colliding_paths() {
        let set =
            TrackedSet::parse(r#"{"tracked": ["/home/u/.config/nvim", "/etc/nvim"]}"#).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(
            set.get("nvim").map(|e| e.path.clone()),
            Some(PathBuf::from("/home/u/.config/nvim"))
        );
    }

    #[test]
    fn remove_by_key_or_path() {
        let mut set = TrackedSet::new();
        set.insert(PathBuf::from("/home/u/.config/waybar")).unwrap();
        set.insert(PathBuf::from("/home/u/.config/hypr")).unwrap();

        let removed = set.remove("waybar").unwrap().unwrap();
        assert_eq!(removed.filename, "waybar");

        let removed = set.remove("/home/u/.config/hypr/").unwrap().unwrap();
        assert_eq!(removed.filename, "hypr");

        assert!(set.remove("kitty").unwrap().is_none());
        assert!(set.is_empty());
    }
}
