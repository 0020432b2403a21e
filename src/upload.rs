//! Folder loading for the project knowledge map
//!
//! Mirrors a browser folder picker: every file is reported with a path that
//! starts with the chosen folder's own name, and the batch is all-or-nothing.

use futures::{stream, StreamExt, TryStreamExt};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Files read at the same time
const READ_CONCURRENCY: usize = 32;

/// Shown when the folder has no usable name (e.g. a filesystem root)
pub const FALLBACK_ROOT_NAME: &str = "Root Project";

/// Stored content of one uploaded file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path below the chosen folder, `/`-separated
    pub relative_path: String,
    pub content: String,
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("not a folder: {0}")]
    NotAFolder(PathBuf),

    #[error("failed to list {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Everything picked from one folder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadBatch {
    pub root_name: String,
    /// Every file found, prefixed with `root_name`, e.g. `project/src/main.rs`
    pub paths: Vec<String>,
    /// Contents of the non-empty files
    pub entries: Vec<FileEntry>,
}

impl UploadBatch {
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

fn root_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| FALLBACK_ROOT_NAME.to_string())
}

/// `/`-joined components of `path` below `root`
fn relative_components(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Read every file under `root`.
///
/// Zero-byte files are listed but not read, so they have no stored content.
/// Any failure discards the whole batch.
pub async fn read_folder(root: &Path) -> Result<UploadBatch, UploadError> {
    if !root.is_dir() {
        return Err(UploadError::NotAFolder(root.to_path_buf()));
    }

    let name = root_name(root);
    let mut paths = Vec::new();
    let mut to_read: Vec<(String, PathBuf)> = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| UploadError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(rel) = relative_components(root, entry.path()) else {
            continue;
        };

        let size = entry
            .metadata()
            .map_err(|source| UploadError::Walk {
                path: entry.path().to_path_buf(),
                source,
            })?
            .len();

        paths.push(format!("{}/{}", name, rel));
        if size > 0 {
            to_read.push((rel, entry.path().to_path_buf()));
        }
    }

    debug!(
        root = %root.display(),
        files = paths.len(),
        readable = to_read.len(),
        "Reading folder"
    );

    let entries = read_entries(to_read).await?;

    info!(
        root = %name,
        files = paths.len(),
        "Folder loaded"
    );

    Ok(UploadBatch {
        root_name: name,
        paths,
        entries,
    })
}

/// Read every `(relative_path, path)` pair concurrently. Any failure fails
/// the whole set; results come back sorted by relative path.
async fn read_entries(to_read: Vec<(String, PathBuf)>) -> Result<Vec<FileEntry>, UploadError> {
    let mut entries: Vec<FileEntry> = stream::iter(to_read)
        .map(|(relative_path, path)| async move {
            match tokio::fs::read(&path).await {
                Ok(bytes) => Ok(FileEntry {
                    relative_path,
                    content: String::from_utf8_lossy(&bytes).into_owned(),
                }),
                Err(source) => Err(UploadError::Read { path, source }),
            }
        })
        .buffer_unordered(READ_CONCURRENCY)
        .try_collect()
        .await?;

    entries.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(entries)
}
