//! Supported extension allow-list
//!
//! The set is built once from configuration and never mutated afterwards.
//! Members are stored lowercase and without a leading dot, so lookups only
//! need to lowercase the candidate.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

/// Built-in allow-list: documents, code and text, structured data, mail and subtitles
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "pdf", "docx", "doc", "rtf", "odt", "txt", "md", "pptx", "ppt", "xlsx", "xls", "csv", "py",
    "sql", "js", "ts", "cs", "java", "go", "sh", "ps1", "json", "xml", "yaml", "yml", "toml",
    "html", "htm", "eml", "msg", "vtt", "srt",
];

/// Immutable set of lowercase, dot-free extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedExtensions {
    set: BTreeSet<String>,
}

impl SupportedExtensions {
    /// Build the set, normalizing every entry (trim, strip leading dots, lowercase)
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self { set }
    }

    /// Case-insensitive membership; the empty extension is never supported
    pub fn is_supported(&self, extension: &str) -> bool {
        !extension.is_empty() && self.set.contains(&extension.to_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.set.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

impl Default for SupportedExtensions {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS)
    }
}

impl fmt::Display for SupportedExtensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        f.write_str(&joined.join(", "))
    }
}

/// Lowercased text after the last '.' of the file name.
///
/// Returns an empty string when the name has no dot, or when its only dot
/// is the leading one (".gitignore").
pub fn extension_of(path: &Path) -> String {
    let Some(name) = path.file_name() else {
        return String::new();
    };
    let name = name.to_string_lossy();
    match name.rfind('.') {
        Some(idx) if idx > 0 => name[idx + 1..].to_lowercase(),
        _ => String::new(),
    }
}
