//! engine::copy
//!
//! Recursive filesystem copy used by push and apply.
//!
//! # Semantics
//!
//! - Directories merge into the destination: files already there but absent
//!   from the source are left alone
//! - A file that already exists at the destination is replaced or kept
//!   according to [`ConflictPolicy`]
//! - With `follow_symlinks` the copy is deep; without it, links are
//!   recreated as links (Unix only)
//! - A destination symlink is replaced, never written through

use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

use crate::core::types::ConflictPolicy;

/// Copy behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyOptions {
    pub follow_symlinks: bool,
    pub conflict: ConflictPolicy,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            follow_symlinks: true,
            conflict: ConflictPolicy::Overwrite,
        }
    }
}

impl CopyOptions {
    /// Same options with a different conflict policy.
    pub fn with_conflict(self, conflict: ConflictPolicy) -> Self {
        Self { conflict, ..self }
    }
}

/// Copy `src` (file, directory, or link) to `dst`, creating missing parents.
pub fn copy_entry(src: &Path, dst: &Path, opts: &CopyOptions) -> io::Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }

    let meta = if opts.follow_symlinks {
        fs::metadata(src)?
    } else {
        fs::symlink_metadata(src)?
    };

    if meta.file_type().is_symlink() {
        copy_link(src, dst, opts.conflict)
    } else if meta.is_dir() {
        copy_dir(src, dst, opts)
    } else {
        copy_file(src, dst, opts.conflict)
    }
}

fn copy_dir(src: &Path, dst: &Path, opts: &CopyOptions) -> io::Result<()> {
    let mut walker = WalkDir::new(src)
        .follow_links(opts.follow_symlinks)
        .sort_by_file_name()
        .into_iter();

    while let Some(entry) = walker.next() {
        let entry = entry.map_err(io::Error::from)?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        let target = dst.join(rel);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            match fs::symlink_metadata(&target) {
                Ok(existing) if existing.is_dir() => {}
                Ok(_) if opts.conflict == ConflictPolicy::Skip => {
                    walker.skip_current_dir();
                }
                Ok(_) => {
                    fs::remove_file(&target)?;
                    fs::create_dir(&target)?;
                }
                Err(_) => fs::create_dir_all(&target)?,
            }
        } else if file_type.is_symlink() {
            copy_link(entry.path(), &target, opts.conflict)?;
        } else {
            copy_file(entry.path(), &target, opts.conflict)?;
        }
    }
    Ok(())
}

fn copy_file(src: &Path, dst: &Path, conflict: ConflictPolicy) -> io::Result<()> {
    if !clear_destination(dst, conflict)? {
        return Ok(());
    }
    fs::copy(src, dst)?;
    Ok(())
}

fn copy_link(src: &Path, dst: &Path, conflict: ConflictPolicy) -> io::Result<()> {
    if !clear_destination(dst, conflict)? {
        return Ok(());
    }
    let target = fs::read_link(src)?;
    make_symlink(&target, dst)
}

/// Make room at `dst`. Returns `false` if the copy should be skipped.
fn clear_destination(dst: &Path, conflict: ConflictPolicy) -> io::Result<bool> {
    let Ok(existing) = fs::symlink_metadata(dst) else {
        return Ok(true);
    };
    if conflict == ConflictPolicy::Skip {
        return Ok(false);
    }
    if existing.is_dir() {
        fs::remove_dir_all(dst)?;
    } else {
        fs::remove_file(dst)?;
    }
    Ok(true)
}

/// Remove whatever is at `path`. Missing paths are fine.
pub fn remove_path(path: &Path) -> io::Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn make_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(not(unix))]
fn make_symlink(_target: &Path, link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        format!(
            "cannot recreate symlink '{}' on this platform; enable follow_symlinks",
            link.display()
        ),
    ))
}
