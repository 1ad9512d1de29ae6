use crate::config::ScanConfig;
use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Places the report beside the analyzed directory.
pub struct ReportWriter {
    file_name: String,
}

impl ReportWriter {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            file_name: config.report_file_name.clone(),
        }
    }

    /// `<parent of directory>/<report file name>`, or inside `directory` when
    /// it has no parent (a filesystem root).
    pub fn report_path(&self, directory: &Path) -> PathBuf {
        match directory.parent() {
            Some(parent) => parent.join(&self.file_name),
            None => directory.join(&self.file_name),
        }
    }

    /// Writes `content`, replacing any previous report, and returns the path written.
    pub fn write(&self, directory: &Path, content: &str) -> Result<PathBuf> {
        let path = self.report_path(directory);
        fs::write(&path, content)?;
        debug!(path = %path.display(), bytes = content.len(), "Report written");
        Ok(path)
    }
}
