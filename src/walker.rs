//! Directory walking shared by every pipeline stage
//!
//! Each stage does its own fresh pass over the filesystem. The walk visits
//! regular files only, never follows symlinks, and sorts entries by file name
//! so that repeated runs over the same tree yield the same order.

use std::path::{Component, Path, PathBuf};

use ignore::WalkBuilder;
use tracing::warn;

/// A file found during a walk, with its path relative to the walk root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedFile {
    pub path: PathBuf,
    pub relative: PathBuf,
}

impl WalkedFile {
    /// Bare file name, directory component stripped.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Relative path rendered with `/` separators regardless of platform.
    pub fn relative_display(&self) -> String {
        relative_display(&self.relative)
    }
}

/// Render a relative path with `/` separators.
pub fn relative_display(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Walk every regular file under `root`.
///
/// Hidden files and ignore files are *not* special here; the stages apply
/// their own exclusion rules. Unreadable directories are logged and skipped.
pub fn walk_files(root: &Path) -> impl Iterator<Item = WalkedFile> + '_ {
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    walker.filter_map(move |entry| {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(root = %root.display(), error = %e, "skipping unreadable entry");
                return None;
            }
        };

        if !entry.file_type().is_some_and(|t| t.is_file()) {
            return None;
        }

        let path = entry.into_path();
        let relative = path
            .strip_prefix(root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| PathBuf::from(path.file_name().unwrap_or_default()));

        Some(WalkedFile { path, relative })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_walk_yields_relative_paths() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.txt", "a");
        write(dir.path(), "pkg/b.py", "b");
        write(dir.path(), "pkg/deep/c.java", "c");

        let rels: Vec<String> = walk_files(dir.path())
            .map(|f| f.relative_display())
            .collect();
        assert_eq!(rels, vec!["a.txt", "pkg/b.py", "pkg/deep/c.java"]);
    }

    #[test]
    fn test_walk_includes_hidden_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), ".hidden", "x");
        write(dir.path(), ".git/config", "x");
        write(dir.path(), "visible.txt", "x");

        let names: Vec<String> = walk_files(dir.path()).map(|f| f.file_name()).collect();
        assert!(names.contains(&".hidden".to_string()));
        assert!(names.contains(&"config".to_string()));
        assert!(names.contains(&"visible.txt".to_string()));
    }

    #[test]
    fn test_walk_is_stable() {
        let dir = TempDir::new().unwrap();
        for name in ["z.py", "m.py", "a.py", "sub/q.py", "sub/b.py"] {
            write(dir.path(), name, "");
        }

        let first: Vec<_> = walk_files(dir.path()).collect();
        let second: Vec<_> = walk_files(dir.path()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_walk_skips_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("empty/nested")).unwrap();
        assert_eq!(walk_files(dir.path()).count(), 0);
    }

    #[test]
    fn test_walk_missing_root_is_empty() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");
        assert_eq!(walk_files(&missing).count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_skips_symlinks() {
        use std::os::unix::fs::symlink;

        let dir = TempDir::new().unwrap();
        write(dir.path(), "real.py", "x = 1");
        symlink(dir.path().join("real.py"), dir.path().join("link.py")).unwrap();

        let names: Vec<String> = walk_files(dir.path()).map(|f| f.file_name()).collect();
        assert_eq!(names, vec!["real.py"]);
    }

    #[test]
    fn test_relative_display_uses_forward_slashes() {
        let rel: PathBuf = ["a", "b", "c.py"].iter().collect();
        assert_eq!(relative_display(&rel), "a/b/c.py");
    }
}
