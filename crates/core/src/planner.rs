use crate::error::RenameError;
use crate::media::{dotted_extension, is_hidden, MediaExtensions, MediaKind};
use crate::resolver::{resolve_date, CaptureTimeReader, DateSource};
use chrono::NaiveDateTime;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub root: PathBuf,
    pub extensions: MediaExtensions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaEntry {
    pub path: PathBuf,
    pub kind: MediaKind,
    pub extension: String,
    pub taken: NaiveDateTime,
    pub date_source: DateSource,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub scanned_files: usize,
    pub media_files: usize,
    pub skipped_unsupported: usize,
    pub skipped_hidden: usize,
}

/// Media files of one directory, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaPlan {
    pub root: PathBuf,
    pub entries: Vec<MediaEntry>,
    pub stats: ScanStats,
}

pub fn generate_plan(
    options: &PlanOptions,
    reader: &dyn CaptureTimeReader,
) -> Result<MediaPlan, RenameError> {
    let root = &options.root;
    if !root.exists() {
        return Err(RenameError::DirectoryNotFound(root.clone()));
    }
    if !root.is_dir() {
        return Err(RenameError::NotADirectory(root.clone()));
    }

    let mut stats = ScanStats::default();
    let files = collect_media_files(root, &options.extensions, &mut stats)?;

    let mut entries = Vec::with_capacity(files.len());
    for (path, kind, extension) in files {
        let resolved = resolve_date(&path, kind, reader);
        debug!(
            "{} -> {} ({:?})",
            path.display(),
            resolved.taken,
            resolved.source
        );
        entries.push(MediaEntry {
            path,
            kind,
            extension,
            taken: resolved.taken,
            date_source: resolved.source,
        });
    }

    // Stable: equal timestamps keep path order.
    entries.sort_by_key(|entry| entry.taken);

    Ok(MediaPlan {
        root: root.clone(),
        entries,
        stats,
    })
}

fn collect_media_files(
    root: &Path,
    extensions: &MediaExtensions,
    stats: &mut ScanStats,
) -> Result<Vec<(PathBuf, MediaKind, String)>, RenameError> {
    let read_err = |source| RenameError::ReadDir {
        path: root.to_path_buf(),
        source,
    };

    let mut out = Vec::new();
    for entry in fs::read_dir(root).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        // Regular files only: symlinks, FIFOs and sockets are never renamed.
        if !entry.file_type().map_err(read_err)?.is_file() {
            continue;
        }
        let path = entry.path();
        stats.scanned_files += 1;

        if is_hidden(&path) {
            stats.skipped_hidden += 1;
            continue;
        }

        match (extensions.classify(&path), dotted_extension(&path)) {
            (Some(kind), Some(extension)) => {
                stats.media_files += 1;
                out.push((path, kind, extension));
            }
            _ => stats.skipped_unsupported += 1,
        }
    }
    out.sort_by(|a, b| a.0.cmp(&b.0));

    Ok(out)
}
