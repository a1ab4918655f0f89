// src/repository/archive.rs
//! Packs a downloaded [`FileTree`] into a zip container on disk.

use super::tree::FileTree;
use crate::constants::{ARCHIVE_EMPTY_MESSAGE, ARCHIVE_FILE_PREFIX, ARCHIVE_FORMAT};
use crate::errors::{io_error_with_path, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::Builder as TempFileBuilder;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Options for [`RepositoryManager::archive`](super::RepositoryManager::archive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveOptions {
    /// Requested container format. Only zip is produced; other values are
    /// accepted and ignored.
    pub format: String,
    /// Prepended to every entry path. Leading `/` are stripped.
    pub prefix: String,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            format: ARCHIVE_FORMAT.to_string(),
            prefix: String::new(),
        }
    }
}

impl ArchiveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

/// The result of an archive request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveOutcome {
    /// The archive was written and left on disk at this path. The caller owns it.
    Written(PathBuf),
    /// The repository yielded no files, so nothing was written.
    Empty,
}

impl ArchiveOutcome {
    /// Path of the written archive, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ArchiveOutcome::Written(path) => Some(path),
            ArchiveOutcome::Empty => None,
        }
    }

    /// `(true, path)` for a written archive, `(false, message)` otherwise.
    ///
    /// # Examples
    /// ```
    /// use bitbucket::repository::ArchiveOutcome;
    ///
    /// assert_eq!(
    ///     ArchiveOutcome::Empty.into_pair(),
    ///     (false, "Could not archive your project.".to_string())
    /// );
    /// ```
    pub fn into_pair(self) -> (bool, String) {
        match self {
            ArchiveOutcome::Written(path) => (true, path.display().to_string()),
            ArchiveOutcome::Empty => (false, ARCHIVE_EMPTY_MESSAGE.to_string()),
        }
    }
}

/// Writes `tree` into a new zip file, each entry at `prefix + path`.
///
/// The container is a named temporary file that is only kept once the archive is
/// complete; if anything fails before that, it is removed when dropped.
pub(crate) fn write_archive(tree: &FileTree, prefix: &str) -> Result<ArchiveOutcome> {
    if tree.is_empty() {
        return Ok(ArchiveOutcome::Empty);
    }
    let prefix = prefix.trim_start_matches('/');

    let temp_file = TempFileBuilder::new()
        .prefix(ARCHIVE_FILE_PREFIX)
        .suffix(".zip")
        .tempfile()
        .map_err(|e| io_error_with_path(e, std::env::temp_dir()))?;
    let temp_path = temp_file.path().to_path_buf();

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(temp_file);
    for (path, content) in tree {
        let name = format!("{}{}", prefix, path);
        log::debug!("Adding '{}' ({} bytes)", name, content.len());
        zip.start_file(name, options)?;
        zip.write_all(content)
            .map_err(|e| io_error_with_path(e, &temp_path))?;
    }
    let temp_file = zip.finish()?;

    let (_file, path) = temp_file
        .keep()
        .map_err(|e| io_error_with_path(e.error, &temp_path))?;
    Ok(ArchiveOutcome::Written(path))
}
