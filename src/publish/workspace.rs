//! publish::workspace
//!
//! The staging workspace and the copy that fills it.
//!
//! # Exclusion
//!
//! Only the source folder's immediate entries are filtered: any entry whose
//! name starts with `.git` (`.git`, `.gitignore`, `.github`, ...) is left
//! out. Everything below a kept directory is copied as-is.
//!
//! # Symbolic links
//!
//! Links are followed and their targets' contents copied. A dangling link
//! or a link cycle fails the scan.
//!
//! # Special files
//!
//! FIFOs, sockets and device nodes fail the scan. Copying a FIFO would
//! block until some other process writes to it.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use thiserror::Error;
use walkdir::WalkDir;

/// Name prefix of entries that are never copied.
pub const EXCLUDED_PREFIX: &str = ".git";

/// Name prefix of workspace directories.
pub const WORKSPACE_PREFIX: &str = "ghpublish-";

/// Errors from scanning or copying the source folder.
#[derive(Debug, Error)]
pub enum PopulateError {
    #[error("cannot read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("cannot copy {}: {source}", path.display())]
    Copy { path: PathBuf, source: io::Error },

    #[error("cannot walk source folder: {0}")]
    Walk(String),

    #[error("{} is not a regular file or directory", path.display())]
    Special { path: PathBuf },
}

/// Whether a top-level entry name is excluded from publishing.
pub fn is_excluded(name: &OsStr) -> bool {
    name.as_encoded_bytes()
        .starts_with(EXCLUDED_PREFIX.as_bytes())
}

/// One item to recreate inside the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ManifestItem {
    /// Where it lives in the source folder
    source: PathBuf,
    /// Path relative to the source folder
    relative: PathBuf,
    /// Directory (created) rather than file (copied)
    is_dir: bool,
}

/// Everything that will be copied out of a source folder.
#[derive(Debug, Clone, Default)]
pub struct SourceManifest {
    items: Vec<ManifestItem>,
}

impl SourceManifest {
    /// Scan `source`, skipping excluded top-level entries.
    ///
    /// Items are ordered so that every directory precedes its contents.
    pub fn scan(source: &Path) -> Result<Self, PopulateError> {
        let read_err = |source_err| PopulateError::Read {
            path: source.to_path_buf(),
            source: source_err,
        };

        let mut entries: Vec<PathBuf> = fs::read_dir(source)
            .map_err(read_err)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<_, _>>()
            .map_err(read_err)?;
        entries.retain(|p| p.file_name().is_some_and(|n| !is_excluded(n)));
        entries.sort();

        let mut items = Vec::new();
        for entry in entries {
            for walked in WalkDir::new(&entry).follow_links(true).sort_by_file_name() {
                let walked = walked.map_err(|e| PopulateError::Walk(e.to_string()))?;
                let relative = walked
                    .path()
                    .strip_prefix(source)
                    .map_err(|e| PopulateError::Walk(e.to_string()))?
                    .to_path_buf();
                let file_type = walked.file_type();
                if !file_type.is_dir() && !file_type.is_file() {
                    return Err(PopulateError::Special {
                        path: walked.path().to_path_buf(),
                    });
                }
                items.push(ManifestItem {
                    source: walked.path().to_path_buf(),
                    relative,
                    is_dir: file_type.is_dir(),
                });
            }
        }

        Ok(Self { items })
    }

    /// Number of regular files to copy.
    pub fn file_count(&self) -> usize {
        self.items.iter().filter(|i| !i.is_dir).count()
    }

    /// Names of the top-level entries that will be copied.
    pub fn top_level(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|i| i.relative.components().count() == 1)
            .map(|i| i.relative.to_string_lossy().into_owned())
            .collect()
    }

    /// Recreate every item under `dest`.
    ///
    /// File permissions are preserved by the copy; timestamps are not.
    pub fn copy_into(&self, dest: &Path) -> Result<(), PopulateError> {
        for item in &self.items {
            let target = dest.join(&item.relative);
            let copy_err = |source| PopulateError::Copy {
                path: item.source.clone(),
                source,
            };
            if item.is_dir {
                fs::create_dir_all(&target).map_err(copy_err)?;
            } else {
                fs::copy(&item.source, &target).map_err(copy_err)?;
            }
        }
        Ok(())
    }
}

/// A uniquely named temporary directory, removed on teardown or drop.
#[derive(Debug)]
pub struct StagingWorkspace {
    dir: TempDir,
}

impl StagingWorkspace {
    /// Create a workspace under the system temp directory.
    pub fn acquire() -> io::Result<Self> {
        Self::acquire_in(&std::env::temp_dir())
    }

    /// Create a workspace under `parent`.
    pub fn acquire_in(parent: &Path) -> io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(parent)?;
        Ok(Self { dir })
    }

    /// Root of the workspace.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the workspace, reporting any failure to do so.
    pub fn teardown(self) -> io::Result<()> {
        self.dir.close()
    }
}
