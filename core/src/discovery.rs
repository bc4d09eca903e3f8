//! Recursive file discovery

use ignore::WalkBuilder;
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// Regular files found under a root, plus any non-fatal walk errors
#[derive(Debug, Default, Clone)]
pub struct Discovery {
    pub files: Vec<PathBuf>,
    pub warnings: Vec<String>,
}

/// Collect every regular file below `root`, depth-first, siblings in name order.
///
/// Nothing is filtered: hidden files and ignore files are treated like any
/// other entry. Symlinked directories are not entered, symlinks to regular
/// files are kept. Unreadable subdirectories are reported and skipped.
pub fn discover_files(root: &Path) -> Discovery {
    debug!("Walking {:?}", root);

    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut discovery = Discovery::default();
    for result in walker {
        match result {
            Ok(entry) => {
                let entry_path = entry.path();
                if entry.depth() > 0 && entry_path.is_file() {
                    discovery.files.push(entry.into_path());
                }
            }
            Err(err) => {
                warn!("Error walking path: {}", err);
                discovery.warnings.push(err.to_string());
            }
        }
    }
    discovery
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, relative.as_bytes()).unwrap();
    }

    fn relative(root: &Path, discovery: &Discovery) -> Vec<String> {
        discovery
            .files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_discovers_nested_files_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "b.txt");
        touch(root, "a/deep/er/x.pdf");
        touch(root, "a/c.md");
        touch(root, "c/.hidden");
        touch(root, ".gitignore");

        let discovery = discover_files(root);
        assert_eq!(
            relative(root, &discovery),
            vec![".gitignore", "a/c.md", "a/deep/er/x.pdf", "b.txt", "c/.hidden"]
        );
        assert!(discovery.warnings.is_empty());
    }

    #[test]
    fn test_ignore_files_do_not_filter() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join(".gitignore"), "*.log\n").unwrap();
        fs::write(root.join(".ignore"), "skipped/\n").unwrap();
        touch(root, "app.log");
        touch(root, "skipped/kept.txt");

        let files = relative(root, &discover_files(root));
        assert!(files.contains(&"app.log".to_string()));
        assert!(files.contains(&"skipped/kept.txt".to_string()));
    }

    #[test]
    fn test_directories_are_excluded() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("empty/nested")).unwrap();

        let discovery = discover_files(root);
        assert!(discovery.files.is_empty());
    }

    #[test]
    fn test_no_duplicates() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        for name in ["one.txt", "two/two.txt", "two/three/three.txt"] {
            touch(root, name);
        }

        let discovery = discover_files(root);
        let mut unique = discovery.files.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), discovery.files.len());
        assert_eq!(discovery.files.len(), 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks() {
        use std::os::unix::fs::symlink;

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "real/file.txt");
        symlink(root.join("real/file.txt"), root.join("link.txt")).unwrap();
        symlink(root.join("missing.txt"), root.join("dangling.txt")).unwrap();
        symlink(root.join("real"), root.join("loop")).unwrap();

        let files = relative(root, &discover_files(root));
        assert_eq!(files, vec!["link.txt", "real/file.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdirectory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "open/a.txt");
        touch(root, "locked/b.txt");
        let locked = root.join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can still read the directory; nothing to check then.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let discovery = discover_files(root);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(relative(root, &discovery), vec!["open/a.txt"]);
        assert!(!discovery.warnings.is_empty());
    }
}
