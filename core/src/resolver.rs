//! Input resolution: classify a path, filter, then hash
//!
//! A path is classified once with a filesystem stat and never re-examined:
//! a supported file is hashed, a directory is walked and every supported
//! file below it is hashed, anything else is rejected.

use crate::discovery::discover_files;
use crate::error::ProcessError;
use crate::extensions::{extension_of, SupportedExtensions};
use crate::hashing::{hash_files, HashResult};
use log::debug;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathKind {
    File,
    Directory,
    /// Dangling symlink, device, socket, FIFO
    Neither,
}

/// Stat `path`, following symlinks.
///
/// Only a path with nothing at all behind it is `PathNotFound`; a dangling
/// symlink exists and classifies as `Neither`. A path running through a
/// regular file (`a.txt/x.pdf`) does not exist either.
pub fn classify(path: &Path) -> Result<PathKind, ProcessError> {
    match fs::symlink_metadata(path) {
        Ok(_) => {}
        Err(e) if is_missing(&e) => return Err(ProcessError::PathNotFound(path.to_path_buf())),
        Err(e) => return Err(ProcessError::read_failure(path, e)),
    }

    Ok(match fs::metadata(path) {
        Ok(meta) if meta.is_file() => PathKind::File,
        Ok(meta) if meta.is_dir() => PathKind::Directory,
        _ => PathKind::Neither,
    })
}

fn is_missing(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

/// Supported files below a directory
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub matched: Vec<PathBuf>,
    pub skipped: usize,
    pub warnings: Vec<String>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.matched.is_empty()
    }
}

/// A classified input that is ready to hash
#[derive(Debug, Clone)]
pub enum Resolved {
    File { path: PathBuf, extension: String },
    Directory { root: PathBuf, selection: Selection },
}

impl Resolved {
    pub fn kind(&self) -> PathKind {
        match self {
            Resolved::File { .. } => PathKind::File,
            Resolved::Directory { .. } => PathKind::Directory,
        }
    }

    pub fn files(&self) -> &[PathBuf] {
        match self {
            Resolved::File { path, .. } => std::slice::from_ref(path),
            Resolved::Directory { selection, .. } => &selection.matched,
        }
    }
}

/// Everything computed for one input
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub input: PathBuf,
    pub kind: PathKind,
    pub results: Vec<HashResult>,
    pub skipped: usize,
    pub warnings: Vec<String>,
}

impl Report {
    pub fn hashed(&self) -> usize {
        self.results.iter().filter(|r| r.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.hashed()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }
}

/// Resolves and hashes inputs against an injected allow-list
#[derive(Debug, Clone, Default)]
pub struct Processor {
    extensions: SupportedExtensions,
}

impl Processor {
    pub fn new(extensions: SupportedExtensions) -> Self {
        Self { extensions }
    }

    pub fn extensions(&self) -> &SupportedExtensions {
        &self.extensions
    }

    /// Extension of a single file, or `UnsupportedExtension`
    pub fn check_file(&self, path: &Path) -> Result<String, ProcessError> {
        let extension = extension_of(path);
        if self.extensions.is_supported(&extension) {
            Ok(extension)
        } else {
            Err(ProcessError::UnsupportedExtension {
                path: path.to_path_buf(),
                extension,
            })
        }
    }

    /// Walk `root` and keep the files whose extension is allow-listed
    pub fn select(&self, root: &Path) -> Selection {
        let discovery = discover_files(root);
        let mut selection = Selection {
            warnings: discovery.warnings,
            ..Selection::default()
        };

        for path in discovery.files {
            if self.extensions.is_supported(&extension_of(&path)) {
                selection.matched.push(path);
            } else {
                debug!("Skipping: {:?} (type not supported)", path);
                selection.skipped += 1;
            }
        }
        selection
    }

    pub fn resolve(&self, path: &Path) -> Result<Resolved, ProcessError> {
        match classify(path)? {
            PathKind::File => {
                let extension = self.check_file(path)?;
                Ok(Resolved::File {
                    path: path.to_path_buf(),
                    extension,
                })
            }
            PathKind::Directory => {
                let selection = self.select(path);
                if selection.is_empty() {
                    return Err(ProcessError::EmptyResultSet {
                        path: path.to_path_buf(),
                        warnings: selection.warnings,
                    });
                }
                Ok(Resolved::Directory {
                    root: path.to_path_buf(),
                    selection,
                })
            }
            PathKind::Neither => Err(ProcessError::NotFileOrDirectory(path.to_path_buf())),
        }
    }

    /// Resolve `path` and hash every selected file
    pub fn run(&self, path: &Path) -> Result<Report, ProcessError> {
        let resolved = self.resolve(path)?;
        let results = hash_files(resolved.files());
        let kind = resolved.kind();
        let (skipped, warnings) = match resolved {
            Resolved::File { .. } => (0, Vec::new()),
            Resolved::Directory { selection, .. } => (selection.skipped, selection.warnings),
        };

        Ok(Report {
            input: path.to_path_buf(),
            kind,
            results,
            skipped,
            warnings,
        })
    }
}
