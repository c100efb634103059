//! core::registry
//!
//! The path registry: short keys mapped to the directories a user wants
//! manageable, persisted in `paths.json`.
//!
//! # Storage
//!
//! `paths.json` is a JSON object `{key: path}` kept in insertion order.
//! A missing, empty or unparsable file reads as an empty registry; it is
//! only rewritten by the next successful mutation.
//!
//! # Example
//!
//! ```ignore
//! use stasher::core::registry::PathRegistry;
//!
//! let registry = PathRegistry::new(&paths);
//! let entry = registry.add(Path::new("/home/u/.config/waybar"))?;
//! assert_eq!(entry.key, "waybar");
//!
//! for entry in registry.list()? {
//!     println!("{} {}", entry.key, entry.path.display());
//! }
//! ```

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::core::atomic;
use crate::core::errors::{NotFoundKind, Result, StashError};
use crate::core::paths::StasherPaths;
use crate::core::types::{key_for_path, looks_like_path, PathEntry};

/// What a `remove` call targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveTarget {
    /// Every entry (`*`).
    All,
    /// A literal path.
    Path(PathBuf),
    /// A registered key.
    Key(String),
}

impl RemoveTarget {
    /// Classify a user argument: `*`, a path (contains a separator), or a key.
    pub fn parse(arg: &str) -> Self {
        let trimmed = arg.trim();
        if trimmed == "*" {
            RemoveTarget::All
        } else if looks_like_path(trimmed) {
            RemoveTarget::Path(PathBuf::from(trimmed))
        } else {
            RemoveTarget::Key(trimmed.to_string())
        }
    }
}

/// Result of a `remove` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// These entries were removed.
    Removed(Vec<PathEntry>),
    /// A bulk removal was declined at the confirmation step.
    Cancelled,
}

/// Persistent `key -> path` registry.
#[derive(Debug, Clone)]
pub struct PathRegistry {
    path: PathBuf,
}

impl PathRegistry {
    /// Create a registry backed by `<root>/paths.json`.
    pub fn new(paths: &StasherPaths) -> Self {
        Self {
            path: paths.registry_path(),
        }
    }

    /// Register a directory under the key derived from its final segment.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the path does not exist
    /// - `NotADirectory` if it is a file
    /// - `InvalidName` if no key can be derived (e.g. `/`)
    /// - `AlreadyExists` if the key is already registered
    pub fn add(&self, path: &Path) -> Result<PathEntry> {
        let path = absolutize(path)?;
        validate_directory(&path)?;

        let key = key_for_path(&path).ok_or_else(|| StashError::InvalidName {
            name: path.display().to_string(),
            reason: "path has no final segment to use as a key".to_string(),
        })?;

        let mut entries = self.load()?;
        if entries.iter().any(|e| e.key == key) {
            return Err(StashError::AlreadyExists(key));
        }

        let entry = PathEntry { key, path };
        entries.push(entry.clone());
        self.save(&entries)?;

        info!(key = %entry.key, path = %entry.path.display(), "registered path");
        Ok(entry)
    }

    /// Remove entries by path, key, or all of them.
    ///
    /// `RemoveTarget::All` calls `confirm` with a prompt first and only
    /// wipes if it answers `true`. Path and key removal re-validate that the
    /// resolved directory still exists.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the key is unknown or no entry has the path
    /// - `NotFound` / `NotADirectory` if the resolved path is gone or a file
    pub fn remove<F>(&self, target: &RemoveTarget, confirm: F) -> Result<RemoveOutcome>
    where
        F: FnOnce(&str) -> Result<bool>,
    {
        let mut entries = self.load()?;

        let path = match target {
            RemoveTarget::All => {
                if !confirm("Are you sure you want to remove all path entries?")? {
                    debug!("bulk path removal declined");
                    return Ok(RemoveOutcome::Cancelled);
                }
                self.wipe()?;
                return Ok(RemoveOutcome::Removed(entries));
            }
            RemoveTarget::Path(path) => absolutize(path)?,
            RemoveTarget::Key(key) => entries
                .iter()
                .find(|e| &e.key == key)
                .map(|e| e.path.clone())
                .ok_or_else(|| StashError::not_found(NotFoundKind::Key, key.clone()))?,
        };

        validate_directory(&path)?;

        let index = entries
            .iter()
            .position(|e| e.path == path)
            .ok_or_else(|| {
                StashError::not_found(NotFoundKind::Path, path.display().to_string())
            })?;
        let removed = entries.remove(index);
        self.save(&entries)?;

        info!(key = %removed.key, "removed path entry");
        Ok(RemoveOutcome::Removed(vec![removed]))
    }

    /// Entries in persisted order. Re-reads storage on every call.
    pub fn list(&self) -> Result<std::vec::IntoIter<PathEntry>> {
        Ok(self.load()?.into_iter())
    }

    /// Look up a key.
    pub fn get(&self, key: &str) -> Result<Option<PathEntry>> {
        Ok(self.load()?.into_iter().find(|e| e.key == key))
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.load()?.is_empty())
    }

    /// Empty the registry without asking.
    ///
    /// Callers gate this themselves.
    pub fn wipe(&self) -> Result<()> {
        self.save(&[])?;
        info!("wiped path registry");
        Ok(())
    }

    fn load(&self) -> Result<Vec<PathEntry>> {
        let Some(contents) = atomic::read_optional(&self.path)? else {
            return Ok(Vec::new());
        };
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        let map: Map<String, Value> = match serde_json::from_str(&contents) {
            Ok(map) => map,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "path registry is unparsable, treating as empty");
                return Ok(Vec::new());
            }
        };

        let entries = map
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::String(path) => Some(PathEntry {
                    key,
                    path: PathBuf::from(path),
                }),
                other => {
                    warn!(key = %key, value = %other, "ignoring non-string registry entry");
                    None
                }
            })
            .collect();
        Ok(entries)
    }

    fn save(&self, entries: &[PathEntry]) -> Result<()> {
        let map: Map<String, Value> = entries
            .iter()
            .map(|e| {
                (
                    e.key.clone(),
                    Value::String(e.path.to_string_lossy().into_owned()),
                )
            })
            .collect();
        atomic::write_json(&self.path, &Value::Object(map))
    }
}

/// Turn a user-supplied path into a normalized absolute path.
///
/// Relative paths are joined onto the current directory; `.` components
/// and trailing separators are dropped. Symlinks are not resolved.
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let cwd = std::env::current_dir().map_err(|e| StashError::io(".", e))?;
        cwd.join(path)
    };
    Ok(joined.components().collect())
}

fn validate_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(StashError::not_found(
            NotFoundKind::Path,
            path.display().to_string(),
        ));
    }
    if !path.is_dir() {
        return Err(StashError::NotADirectory(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_registry() -> (TempDir, PathRegistry) {
        let temp = TempDir::new().expect("create temp dir");
        let paths = StasherPaths::new(temp.path().join("data"));
        let registry = PathRegistry::new(&paths);
        (temp, registry)
    }

    fn config_dir(temp: &TempDir, name: &str) -> PathBuf {
        let dir = temp.path().join("home/.config").join(name);
        fs::create_dir_all(&dir).expect("create config dir");
        dir
    }

    fn keys(registry: &PathRegistry) -> Vec<String> {
        registry.list().expect("list").map(|e| e.key).collect()
    }

    #[test]
    fn add_derives_key_from_final_segment() {
        let (temp, registry) = create_test_registry();
        let dir = config_dir(&temp, "foo");

        let entry = registry.add(&dir).expect("add");

        assert_eq!(entry.key, "foo");
        assert_eq!(entry.path, dir);
        assert_eq!(registry.get("foo").expect("get"), Some(entry));
    }

    #[test]
    fn add_missing_path_fails() {
        let (temp, registry) = create_test_registry();
        let err = registry.add(&temp.path().join("nope")).unwrap_err();
        assert!(matches!(
            err,
            StashError::NotFound {
                kind: NotFoundKind::Path,
                ..
            }
        ));
    }

    #[test]
    fn add_file_fails() {
        let (temp, registry) = create_test_registry();
        let file = temp.path().join("bashrc");
        fs::write(&file, "alias ll='ls -l'").expect("write");

        let err = registry.add(&file).unwrap_err();
        assert!(matches!(err, StashError::NotADirectory(_)));
    }

    #[test]
    fn add_duplicate_key_fails_and_keeps_state() {
        let (temp, registry) = create_test_registry();
        registry.add(&config_dir(&temp, "foo")).expect("add");

        let other = temp.path().join("elsewhere/foo");
        fs::create_dir_all(&other).expect("create");
        let err = registry.add(&other).unwrap_err();

        assert!(matches!(err, StashError::AlreadyExists(ref k) if k == "foo"));
        assert_eq!(keys(&registry), vec!["foo"]);
    }

    #[test]
    fn list_preserves_insertion_order() {
        let (temp, registry) = create_test_registry();
        for name in ["waybar", "hypr", "kitty"] {
            registry.add(&config_dir(&temp, name)).expect("add");
        }
        assert_eq!(keys(&registry), vec!["waybar", "hypr", "kitty"]);
    }

    #[test]
    fn corrupt_storage_reads_as_empty() {
        let (_temp, registry) = create_test_registry();
        fs::create_dir_all(registry.path.parent().unwrap()).unwrap();
        fs::write(&registry.path, "{not json").unwrap();

        assert!(registry.is_empty().expect("is_empty"));
        // Never auto-repaired on read
        assert_eq!(fs::read_to_string(&registry.path).unwrap(), "{not json");
    }

    #[test]
    fn remove_by_key() {
        let (temp, registry) = create_test_registry();
        registry.add(&config_dir(&temp, "foo")).expect("add");
        registry.add(&config_dir(&temp, "bar")).expect("add");

        let outcome = registry
            .remove(&RemoveTarget::parse("foo"), |_| unreachable!())
            .expect("remove");

        assert!(matches!(outcome, RemoveOutcome::Removed(ref v) if v[0].key == "foo"));
        assert_eq!(keys(&registry), vec!["bar"]);
    }

    #[test]
    fn remove_by_path() {
        let (temp, registry) = create_test_registry();
        let dir = config_dir(&temp, "foo");
        registry.add(&dir).expect("add");

        let target = RemoveTarget::parse(dir.to_str().unwrap());
        assert!(matches!(target, RemoveTarget::Path(_)));
        registry.remove(&target, |_| unreachable!()).expect("remove");

        assert!(registry.is_empty().unwrap());
    }

    #[test]
    fn remove_unknown_key_fails() {
        let (_temp, registry) = create_test_registry();
        let err = registry
            .remove(&RemoveTarget::Key("ghost".into()), |_| Ok(true))
            .unwrap_err();
        assert!(matches!(
            err,
            StashError::NotFound {
                kind: NotFoundKind::Key,
                ..
            }
        ));
    }

    #[test]
    fn remove_unregistered_path_fails() {
        let (temp, registry) = create_test_registry();
        let dir = config_dir(&temp, "foo");

        let err = registry
            .remove(&RemoveTarget::Path(dir), |_| Ok(true))
            .unwrap_err();
        assert!(matches!(
            err,
            StashError::NotFound {
                kind: NotFoundKind::Path,
                ..
            }
        ));
    }

    #[test]
    fn remove_all_requires_confirmation() {
        let (temp, registry) = create_test_registry();
        registry.add(&config_dir(&temp, "foo")).expect("add");

        let outcome = registry
            .remove(&RemoveTarget::All, |_| Ok(false))
            .expect("remove");
        assert_eq!(outcome, RemoveOutcome::Cancelled);
        assert_eq!(keys(&registry), vec!["foo"]);

        let outcome = registry
            .remove(&RemoveTarget::All, |_| Ok(true))
            .expect("remove");
        assert!(matches!(outcome, RemoveOutcome::Removed(ref v) if v.len() == 1));
        assert!(registry.is_empty().unwrap());
    }

    #[test]
    fn wipe_empties_without_asking() {
        let (temp, registry) = create_test_registry();
        registry.add(&config_dir(&temp, "foo")).expect("add");

        registry.wipe().expect("wipe");

        assert!(registry.is_empty().unwrap());
    }

    #[test]
    fn absolutize_normalizes() {
        let abs = absolutize(Path::new("/home/u/./.config/foo/")).unwrap();
        assert_eq!(abs, PathBuf::from("/home/u/.config/foo"));

        let rel = absolutize(Path::new("foo")).unwrap();
        assert!(rel.is_absolute());
        assert!(rel.ends_with("foo"));
    }
}
