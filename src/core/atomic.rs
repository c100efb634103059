//! core::atomic
//!
//! Atomic file replacement for every persisted Stasher file.
//!
//! Writes go to a sibling temp file, are synced, then renamed over the
//! target. A failed write leaves the previous content untouched.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::core::errors::StashError;

/// Write `contents` to `path` atomically.
///
/// Creates parent directories if needed.
///
/// # Errors
///
/// Returns `StashError::Write` naming the file that could not be written.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StashError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_error(parent))?;
    }

    let temp_path = temp_path_for(path);
    let result = (|| {
        let mut file = fs::File::create(&temp_path).map_err(write_error(&temp_path))?;
        file.write_all(contents).map_err(write_error(&temp_path))?;
        file.sync_all().map_err(write_error(&temp_path))?;
        fs::rename(&temp_path, path).map_err(write_error(path))
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

/// Serialize `value` as pretty JSON and write it atomically.
pub fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), StashError> {
    let mut contents = serde_json::to_vec_pretty(value).map_err(|e| StashError::Write {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })?;
    contents.push(b'\n');
    write_atomic(path, &contents)
}

/// Read a file to a string, mapping "does not exist" to `None`.
pub fn read_optional(path: &Path) -> Result<Option<String>, StashError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StashError::io(path, e)),
    }
}

fn write_error(path: &Path) -> impl FnOnce(std::io::Error) -> StashError {
    let path = path.to_path_buf();
    move |source| StashError::Write { path, source }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_then_read() {
        let temp = TempDir::new().expect("create temp dir");
        let path = temp.path().join("nested").join("active.txt");

        write_atomic(&path, b"dark").expect("write");

        assert_eq!(read_optional(&path).expect("read").as_deref(), Some("dark"));
        assert!(!temp.path().join("nested").join("active.txt.tmp").exists());
    }

    #[test]
    fn missing_file_reads_as_none() {
        let temp = TempDir::new().expect("create temp dir");
        assert!(read_optional(&temp.path().join("missing")).expect("read").is_none());
    }

    #[test]
    fn failed_write_keeps_previous_content() {
        let temp = TempDir::new().expect("create temp dir");
        let path = temp.path().join("paths.json");
        fs::write(&path, "{}").expect("seed");

        // A directory squatting on the temp name makes File::create fail.
        fs::create_dir(temp.path().join("paths.json.tmp")).expect("squat");

        let err = write_atomic(&path, b"{\"broken\":").unwrap_err();
        assert!(matches!(err, StashError::Write { .. }));
        assert_eq!(fs::read_to_string(&path).expect("read"), "{}");
    }

    #[test]
    fn json_is_pretty() {
        let temp = TempDir::new().expect("create temp dir");
        let path = temp.path().join("x.json");
        write_json(&path, &serde_json::json!({"a": "b"})).expect("write");
        assert_eq!(
            fs::read_to_string(&path).expect("read"),
            "{\n  \"a\": \"b\"\n}\n"
        );
    }
}
