//! File classifier.
//!
//! Scans a directory (non-recursively) and groups regular files by
//! lowercased extension. Extensions keep the leading dot so the group
//! keys read like suffixes (".png", ".mp4").

use crate::result::{MedprobeError, MedprobeResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Extensions treated as still/animated image containers
const GRAPHICAL_EXTENSIONS: [&str; 7] =
    [".jpg", ".jpeg", ".png", ".gif", ".webp", ".tiff", ".bmp"];

/// Mapping from lowercased extension to the ordered list of file paths
pub type FileGroups = BTreeMap<String, Vec<PathBuf>>;

/// Check whether an extension (with leading dot) is a graphical format.
#[must_use]
pub fn is_graphical(ext: &str) -> bool {
    GRAPHICAL_EXTENSIONS.contains(&ext)
}

/// Lowercased extension of a path, with the leading dot.
///
/// Files without an extension yield an empty string.
#[must_use]
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Scan a directory and group its regular files by extension.
///
/// Subdirectories are not recursed into. Paths within a group are
/// sorted so repeated runs visit files in the same order.
///
/// # Errors
///
/// Returns [`MedprobeError::ScanDir`] if the directory cannot be
/// listed. This is the one fatal error in the harness.
pub fn scan_dir(dir: &Path) -> MedprobeResult<FileGroups> {
    let entries = std::fs::read_dir(dir).map_err(|source| MedprobeError::ScanDir {
        path: dir.display().to_string(),
        source,
    })?;

    let mut groups = FileGroups::new();
    for entry in entries {
        let entry = entry.map_err(|source| MedprobeError::ScanDir {
            path: dir.display().to_string(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        groups.entry(extension_of(&path)).or_default().push(path);
    }

    for files in groups.values_mut() {
        files.sort();
    }

    Ok(groups)
}
