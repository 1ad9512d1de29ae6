use crate::config::ScanConfig;
use crate::error::{ProbeError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Why a file's contents were not made available to a facet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Unreadable(String),
    NotUtf8,
    TooLarge { size: u64, max_size: u64 },
}

/// Outcome of reading one file. Facets skip anything that is not `Text`.
#[derive(Debug)]
pub enum FileRead {
    Text(String),
    Skipped(SkipReason),
}

impl FileRead {
    pub fn into_text(self) -> Option<String> {
        match self {
            FileRead::Text(text) => Some(text),
            FileRead::Skipped(_) => None,
        }
    }
}

pub struct ProjectWalker {
    root: PathBuf,
    exclude_dirs: Vec<String>,
    max_file_size: u64,
}

impl ProjectWalker {
    pub fn new<P: Into<PathBuf>>(root: P, config: &ScanConfig) -> Self {
        Self {
            root: root.into(),
            exclude_dirs: config.exclude_dirs.clone(),
            max_file_size: config.max_file_size,
        }
    }

    /// Fails only when the root itself is unusable; everything below it is best effort.
    pub fn validate_root(&self) -> Result<()> {
        if !self.root.exists() {
            return Err(ProbeError::DirectoryNotFound {
                path: self.root.display().to_string(),
            });
        }

        if !self.root.is_dir() {
            return Err(ProbeError::NotADirectory {
                path: self.root.display().to_string(),
            });
        }

        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every visible file under the root, in sorted walk order.
    pub fn files(&self) -> Vec<PathBuf> {
        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| self.should_traverse(e));

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!(error = %err, "Skipping unreadable directory entry");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            if is_hidden_name(entry.file_name().to_str().unwrap_or("")) {
                continue;
            }

            files.push(entry.into_path());
        }

        files
    }

    /// Visible files whose extension is one of `extensions` (lowercase, no dot).
    pub fn files_with_extensions(&self, extensions: &[&str]) -> Vec<PathBuf> {
        self.files()
            .into_iter()
            .filter(|path| {
                path.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|ext| extensions.contains(&ext))
            })
            .collect()
    }

    pub fn read_text(&self, path: &Path) -> FileRead {
        let outcome = self.read_text_inner(path);
        if let FileRead::Skipped(ref reason) = outcome {
            debug!(path = %path.display(), reason = ?reason, "Skipping file");
        }
        outcome
    }

    fn read_text_inner(&self, path: &Path) -> FileRead {
        let metadata = match std::fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) => return FileRead::Skipped(SkipReason::Unreadable(e.to_string())),
        };

        if metadata.len() > self.max_file_size {
            return FileRead::Skipped(SkipReason::TooLarge {
                size: metadata.len(),
                max_size: self.max_file_size,
            });
        }

        match std::fs::read(path) {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(text) => FileRead::Text(text),
                Err(_) => FileRead::Skipped(SkipReason::NotUtf8),
            },
            Err(e) => FileRead::Skipped(SkipReason::Unreadable(e.to_string())),
        }
    }

    /// Reads a file directly under the root, if present.
    pub fn read_top_level(&self, name: &str) -> Option<FileRead> {
        let path = self.root.join(name);
        if path.exists() {
            Some(self.read_text(&path))
        } else {
            None
        }
    }

    pub fn top_level_exists(&self, name: &str) -> bool {
        self.root.join(name).exists()
    }

    fn should_traverse(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }

        let name = entry.file_name().to_string_lossy();
        !self
            .exclude_dirs
            .iter()
            .any(|exclude| exclude.eq_ignore_ascii_case(&name))
    }
}

pub fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.')
}

/// Bare file name used when labelling findings.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn walker_for(root: &Path) -> ProjectWalker {
        ProjectWalker::new(root, &ScanConfig::default())
    }

    #[test]
    fn test_validate_root() {
        let temp_dir = TempDir::new().unwrap();
        assert!(walker_for(temp_dir.path()).validate_root().is_ok());

        let missing = temp_dir.path().join("missing");
        assert!(matches!(
            walker_for(&missing).validate_root(),
            Err(ProbeError::DirectoryNotFound { .. })
        ));

        let file = temp_dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        assert!(matches!(
            walker_for(&file).validate_root(),
            Err(ProbeError::NotADirectory { .. })
        ));
    }

    #[test]
    fn test_files_skip_hidden_and_excluded() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("app.py"), "print('hi')").unwrap();
        fs::write(root.join(".env"), "SECRET=1").unwrap();
        fs::create_dir(root.join("node_modules")).unwrap();
        fs::write(root.join("node_modules").join("lib.js"), "x").unwrap();
        fs::create_dir(root.join("src")).unwrap();
        fs::write(root.join("src").join("b.js"), "x").unwrap();
        fs::write(root.join("src").join("a.js"), "x").unwrap();

        let files = walker_for(root).files();
        let names: Vec<String> = files.iter().map(|p| display_name(p)).collect();

        assert_eq!(names, vec!["app.py", "a.js", "b.js"]);
    }

    #[test]
    fn test_files_with_extensions() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("app.py"), "").unwrap();
        fs::write(root.join("index.js"), "").unwrap();
        fs::write(root.join("README.md"), "").unwrap();

        let files = walker_for(root).files_with_extensions(&["js", "py"]);
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_read_text_outcomes() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("ok.py"), "import flask").unwrap();
        fs::write(root.join("binary.py"), [0xff, 0xfe, 0x00, 0x80]).unwrap();

        let walker = walker_for(root);
        assert!(matches!(walker.read_text(&root.join("ok.py")), FileRead::Text(_)));
        assert!(matches!(
            walker.read_text(&root.join("binary.py")),
            FileRead::Skipped(SkipReason::NotUtf8)
        ));
        assert!(matches!(
            walker.read_text(&root.join("gone.py")),
            FileRead::Skipped(SkipReason::Unreadable(_))
        ));
    }

    #[test]
    fn test_read_text_respects_size_limit() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("big.js"), "x".repeat(64)).unwrap();

        let config = ScanConfig {
            max_file_size: 16,
            ..ScanConfig::default()
        };
        let walker = ProjectWalker::new(root, &config);

        assert!(matches!(
            walker.read_text(&root.join("big.js")),
            FileRead::Skipped(SkipReason::TooLarge { size: 64, max_size: 16 })
        ));
    }
}
