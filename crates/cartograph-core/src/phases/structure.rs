//! Phase 1: Walk the file tree under the root and list files and directories.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::{
    AnalysisConfig, TreeEntry, IGNORED_DIRS, IGNORED_FILE_NAMES, IGNORED_FILE_SUFFIXES,
};
use crate::error::AnalysisError;

/// A file found by the walk, not yet read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedFile {
    /// Root-relative path with `/` separators.
    pub path: String,
    pub abs_path: PathBuf,
    /// Lower-case extension without the dot; empty when there is none.
    pub extension: String,
    pub size: u64,
}

#[derive(Debug, Clone)]
pub struct WalkResult {
    /// Canonical root directory.
    pub root: PathBuf,
    /// Sorted by path.
    pub files: Vec<WalkedFile>,
    /// Sorted by path. The root itself is `.` at depth 0.
    pub directories: Vec<TreeEntry>,
}

/// Check the root exists and is a directory, returning its canonical form.
pub fn validate_root(root: &str) -> Result<PathBuf, AnalysisError> {
    let path = Path::new(root);
    if !path.exists() {
        return Err(AnalysisError::RootNotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(AnalysisError::RootNotDirectory(path.to_path_buf()));
    }
    Ok(path.canonicalize().unwrap_or_else(|_| path.to_path_buf()))
}

fn is_pruned_dir(entry: &DirEntry, excludes: &[String]) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.')
        || IGNORED_DIRS.iter().any(|d| name == *d)
        || excludes.iter().any(|p| name == p.as_str())
}

fn is_ignored_file(name: &str, excludes: &[String]) -> bool {
    name.starts_with('.')
        || IGNORED_FILE_NAMES.contains(&name)
        || IGNORED_FILE_SUFFIXES.iter().any(|s| name.ends_with(s))
        || excludes.iter().any(|p| name == p.as_str())
}

/// Lower-case extension of a file name, without the dot.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default()
}

/// Run the structure phase.
///
/// A file's depth is the number of directories between it and the root, so
/// files directly under the root are at depth 0 and `max_depth = 1` still
/// lists `src/main.py` but not `src/app/main.py`. Symbolic links are never
/// followed.
pub fn run_structure_phase(config: &AnalysisConfig) -> Result<WalkResult, AnalysisError> {
    let root = validate_root(&config.root)?;
    let allow = config.normalized_extensions();
    let excludes = &config.exclude_patterns;

    let mut files = Vec::new();
    let mut dir_counts: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    dir_counts.insert(".".to_string(), (0, 0));

    let walker = WalkDir::new(&root)
        .follow_links(false)
        .max_depth(config.max_depth.saturating_add(1))
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_pruned_dir(e, excludes));

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!("skipping unreadable entry: {err}");
                continue;
            }
        };
        if entry.depth() == 0 {
            continue;
        }

        let abs_path = entry.path();
        let rel_path = abs_path
            .strip_prefix(&root)
            .unwrap_or(abs_path)
            .to_string_lossy()
            .replace('\\', "/");

        let file_type = entry.file_type();
        if file_type.is_symlink() {
            debug!("not following symlink {rel_path}");
            continue;
        }

        if file_type.is_dir() {
            // Directories at max_depth + 1 are only reached so their
            // children are cut off; they hold no listed files.
            if entry.depth() <= config.max_depth {
                dir_counts.entry(rel_path).or_insert((entry.depth(), 0));
            } else {
                debug!("depth limit reached at {rel_path}");
            }
            continue;
        }
        if !file_type.is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if is_ignored_file(&name, excludes) {
            continue;
        }
        let extension = extension_of(abs_path);
        if let Some(ref allow) = allow {
            if !allow.iter().any(|e| *e == extension) {
                continue;
            }
        }

        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        let parent = Path::new(&rel_path)
            .parent()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| ".".to_string());
        if let Some((_, count)) = dir_counts.get_mut(&parent) {
            *count += 1;
        }

        files.push(WalkedFile {
            path: rel_path,
            abs_path: abs_path.to_path_buf(),
            extension,
            size,
        });
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    let directories = dir_counts
        .into_iter()
        .map(|(path, (depth, file_count))| TreeEntry {
            path,
            depth,
            file_count,
        })
        .collect();

    Ok(WalkResult {
        root,
        files,
        directories,
    })
}

/// Count listed files per extension; files without one count under `(none)`.
pub fn files_by_extension(files: &[WalkedFile]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for file in files {
        let key = if file.extension.is_empty() {
            "(none)".to_string()
        } else {
            file.extension.clone()
        };
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}
