//! Local course content collection

use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// A file read from the content directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentFile {
    /// Path inside the target repository, `/`-separated
    pub path: String,
    pub bytes: Vec<u8>,
}

/// Errors that can occur while reading course content
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Content directory not found: {0}")]
    MissingDir(PathBuf),

    #[error("Specified entry must be a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Names of the pushable (directory) entries directly under `content_dir`, sorted
pub fn list_entries(content_dir: &Path) -> Result<Vec<String>, ContentError> {
    if !content_dir.is_dir() {
        return Err(ContentError::MissingDir(content_dir.to_path_buf()));
    }

    let read = std::fs::read_dir(content_dir).map_err(|source| ContentError::Read {
        path: content_dir.to_path_buf(),
        source,
    })?;

    let mut names = Vec::new();
    for entry in read {
        let entry = entry.map_err(|source| ContentError::Read {
            path: content_dir.to_path_buf(),
            source,
        })?;
        if entry.path().is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Read every file below the selected entries
///
/// Paths are relative to `content_dir`, so selecting `week1` yields files like
/// `week1/src/main.rs`. Output is sorted by path.
pub fn collect(content_dir: &Path, selected: &[String]) -> Result<Vec<ContentFile>, ContentError> {
    let mut files = Vec::new();

    for name in selected {
        let root = content_dir.join(name);
        if !root.is_dir() {
            return Err(ContentError::NotADirectory(root));
        }

        for entry in WalkDir::new(&root).follow_links(true) {
            let entry = entry.map_err(|source| ContentError::Walk {
                path: root.clone(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let bytes = std::fs::read(entry.path()).map_err(|source| ContentError::Read {
                path: entry.path().to_path_buf(),
                source,
            })?;
            files.push(ContentFile {
                path: repo_path(content_dir, entry.path()),
                bytes,
            });
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

/// Path of `file` relative to `base`, joined with `/` regardless of platform
fn repo_path(base: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(base).unwrap_or(file);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
