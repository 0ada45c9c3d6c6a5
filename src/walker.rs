use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};

use crate::error::{Error, Result};

/// A note file found under a notes directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// Path relative to the notes root.
    pub relative_path: PathBuf,
    /// Fully resolved absolute path.
    pub absolute_path: PathBuf,
}

/// Extensions picked up when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["md", "txt"];

/// Which files a walk accepts.
#[derive(Debug, Clone)]
pub struct FileFilter {
    extensions: Vec<String>,
    include: Option<GlobMatcher>,
}

impl Default for FileFilter {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            include: None,
        }
    }
}

impl FileFilter {
    /// Accept files with any of `extensions` (without the leading dot).
    pub fn new(extensions: &[String]) -> Self {
        Self {
            extensions: extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            include: None,
        }
    }

    /// Additionally require the relative path to match a glob pattern.
    pub fn with_include(mut self, pattern: &str) -> Result<Self> {
        let glob = Glob::new(pattern).map_err(|e| {
            Error::Config(format!("invalid glob pattern: {e}"))
        })?;
        self.include = Some(glob.compile_matcher());
        Ok(self)
    }

    fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
            })
    }

    fn includes(&self, relative_path: &Path) -> bool {
        self.include
            .as_ref()
            .is_none_or(|glob| glob.is_match(relative_path))
    }
}

/// Recursively walk a directory and collect note files.
///
/// Hidden files and directories (names starting with `.`) are skipped.
/// Results are sorted by relative path.
pub fn discover_files(
    root: &Path,
    filter: &FileFilter,
) -> Result<Vec<DiscoveredFile>> {
    let canonical_root = root.canonicalize()?;
    let mut results = Vec::new();
    walk_dir(&canonical_root, &canonical_root, filter, &mut results)?;
    results.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(results)
}

fn walk_dir(
    root: &Path,
    current: &Path,
    filter: &FileFilter,
    results: &mut Vec<DiscoveredFile>,
) -> Result<()> {
    for entry in std::fs::read_dir(current)? {
        let entry = entry?;
        let file_name = entry.file_name();

        if file_name.to_string_lossy().starts_with('.') {
            continue;
        }

        let file_type = entry.file_type()?;
        let path = entry.path();

        if file_type.is_dir() {
            walk_dir(root, &path, filter, results)?;
        } else if file_type.is_symlink() {
            let Ok(resolved) = path.canonicalize() else {
                tracing::debug!(
                    path = %path.display(),
                    "skipping broken symlink"
                );
                continue;
            };
            // Never follow directory links back into the tree.
            if resolved.is_dir() {
                continue;
            }
            if resolved.is_file() && filter.has_extension(&resolved) {
                push_if_included(root, &path, &resolved, filter, results);
            }
        } else if file_type.is_file() && filter.has_extension(&path) {
            let abs = path.canonicalize()?;
            push_if_included(root, &path, &abs, filter, results);
        }
    }

    Ok(())
}

fn push_if_included(
    root: &Path,
    walked_path: &Path,
    absolute_path: &Path,
    filter: &FileFilter,
    results: &mut Vec<DiscoveredFile>,
) {
    let relative_path = walked_path
        .strip_prefix(root)
        .unwrap_or(walked_path)
        .to_path_buf();

    if filter.includes(&relative_path) {
        results.push(DiscoveredFile {
            relative_path,
            absolute_path: absolute_path.to_path_buf(),
        });
    }
}
