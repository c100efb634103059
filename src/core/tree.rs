//! core::tree
//!
//! Read-only recursive listing of a stash for display.
//!
//! Children are sorted by name. Stasher's own files (`.stash.json`,
//! staging leftovers) are hidden at the top level, symlinks are shown as
//! leaves and never followed, and unreadable directories are shown empty.

use std::fs;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::core::errors::Result;
use crate::core::paths::is_internal_entry;
use crate::core::stash::StashStore;

/// One node of a rendered tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub name: String,
    pub is_dir: bool,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Render as box-drawing text, one node per line. Directories end in `/`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.label());
        out.push('\n');
        render_children(&self.children, "", &mut out);
        out
    }

    fn label(&self) -> String {
        if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }

    fn build(path: &Path, name: String, is_dir: bool, top_level: bool) -> Self {
        let children = if is_dir {
            read_children(path, top_level)
        } else {
            Vec::new()
        };
        Self {
            name,
            is_dir,
            children,
        }
    }
}

fn read_children(dir: &Path, top_level: bool) -> Vec<TreeNode> {
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    let mut children = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!(path = %dir.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        let name = entry.file_name().to_string_lossy().into_owned();
        if top_level && is_internal_entry(&name) {
            continue;
        }
        let is_dir = entry.file_type().is_dir();
        children.push(TreeNode::build(entry.path(), name, is_dir, false));
    }
    children
}

fn render_children(children: &[TreeNode], prefix: &str, out: &mut String) {
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        let (branch, indent) = if last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        out.push_str(prefix);
        out.push_str(branch);
        out.push_str(&child.label());
        out.push('\n');
        render_children(&child.children, &format!("{}{}", prefix, indent), out);
    }
}

/// Build the tree of a stash.
///
/// # Errors
///
/// Only `NotFound`, when the stash does not resolve.
pub fn tree(store: &StashStore, name: &str) -> Result<TreeNode> {
    let record = store.resolve(name)?;
    let is_dir = fs::symlink_metadata(&record.directory)
        .map(|m| m.is_dir())
        .unwrap_or(false);
    Ok(TreeNode::build(&record.directory, record.name, is_dir, true))
}
