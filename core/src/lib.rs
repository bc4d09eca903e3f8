//! filehash core
//!
//! Recursive file discovery, extension allow-listing and streaming SHA-256
//! fingerprints, shared by the command-line client and the HTTP service.

pub mod config;
pub mod discovery;
pub mod error;
pub mod extensions;
pub mod hashing;
pub mod resolver;

pub use crate::config::{load_config, AppConfig};
pub use crate::discovery::{discover_files, Discovery};
pub use crate::error::ProcessError;
pub use crate::extensions::{extension_of, SupportedExtensions, DEFAULT_EXTENSIONS};
pub use crate::hashing::{compute_file_hash, hash_files, read_preview, HashOutcome, HashResult};
pub use crate::resolver::{classify, PathKind, Processor, Report, Resolved, Selection};
