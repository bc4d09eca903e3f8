//! Error taxonomy for path resolution and hashing

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong between receiving a path and reporting its hash
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Path not found at: '{}'", .0.display())]
    PathNotFound(PathBuf),

    #[error("File type '{extension}' not supported for single file processing: '{}'", .path.display())]
    UnsupportedExtension { path: PathBuf, extension: String },

    #[error("Input path '{}' is not a file or a directory", .0.display())]
    NotFileOrDirectory(PathBuf),

    #[error("Invalid path '{}'. Directory traversal detected.", .0.display())]
    TraversalRejected(PathBuf),

    #[error("Error processing '{}': {source}", .path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No supported files found in folder '{}'", .path.display())]
    EmptyResultSet {
        path: PathBuf,
        /// Walk errors met on the way, e.g. unreadable subdirectories
        warnings: Vec<String>,
    },
}

impl ProcessError {
    /// Wrap an I/O error raised while reading `path`
    pub fn read_failure(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::ReadFailure {
            path: path.into(),
            source,
        }
    }

    /// Only an empty folder is a soft outcome; everything else is a failure
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::EmptyResultSet { .. })
    }

    /// Walk errors carried by an empty folder result
    pub fn walk_warnings(&self) -> &[String] {
        match self {
            Self::EmptyResultSet { warnings, .. } => warnings.as_slice(),
            _ => &[],
        }
    }
}
