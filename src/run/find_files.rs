//! Functions for retrieving lists of files from disk.

use crate::{Config, ErrorKind, Result};

use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Recursively finds the eligible source files of a testbase.
///
/// A file is returned as is, a directory is walked in sorted order and only
/// files with a supported extension are kept. All returned paths are normalised.
pub fn in_path(path: &Path, config: &Config) -> Result<Vec<PathBuf>> {
    let metadata = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(e) => return Err(ErrorKind::UnreadableTestbase(path.display().to_string(), e.to_string()).into()),
    };

    if metadata.is_dir() {
        files_in_dir(path, config)
    } else if metadata.is_file() {
        Ok(vec![normalize(path)])
    } else {
        Err(ErrorKind::UnreadableTestbase(path.display().to_string(),
                                          "neither a file nor a directory".to_owned()).into())
    }
}

fn files_in_dir(path: &Path, config: &Config) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(path).sort_by(|a, b| a.file_name().cmp(b.file_name())) {
        let entry = entry?;

        if !entry.file_type().is_file() {
            continue;
        }

        let is_supported = entry.path().extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| config.is_extension_supported(ext))
            .unwrap_or(false);

        if is_supported {
            files.push(normalize(entry.path()));
        }
    }

    trace!("found {} eligible files in {}", files.len(), path.display());
    Ok(files)
}

/// Lexically normalises a path, so that it can be compared with `file!()` paths.
///
/// `.` components are dropped and `..` components cancel out the preceding
/// component. The file system is never consulted.
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => (),
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            },
            other => normalized.push(other.as_os_str()),
        }
    }

    normalized
}
