use crate::error::{ProbeError, Result};
use crate::ui::progress::finish_progress_with_summary;
use crate::ui::ProgressManager;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};
use zip::ZipArchive;

#[derive(Debug, Clone)]
pub struct ExtractionSummary {
    pub target: PathBuf,
    pub entries: usize,
    pub files: usize,
    pub bytes: u64,
    pub duration: Duration,
}

/// Unpacks an archive into a freshly recreated directory.
pub struct ArchiveExtractor<'a> {
    progress: &'a ProgressManager,
}

impl<'a> ArchiveExtractor<'a> {
    pub fn new(progress: &'a ProgressManager) -> Self {
        Self { progress }
    }

    /// Entry names of `archive` in stored order, without extracting anything.
    pub fn list_entries(archive: &Path) -> Result<Vec<String>> {
        let zip = ZipArchive::new(File::open(archive)?)?;
        Ok(zip.file_names().map(|name| name.to_string()).collect())
    }

    /// Replaces `target` with the contents of `archive`. Every entry name is
    /// checked before `target` is touched, so an archive with an entry
    /// escaping the target leaves the previous extraction in place.
    pub fn extract(&self, archive: &Path, target: &Path) -> Result<ExtractionSummary> {
        let start = Instant::now();
        let mut zip = ZipArchive::new(File::open(archive)?)?;

        let mut destinations = Vec::with_capacity(zip.len());
        for index in 0..zip.len() {
            let entry = zip.by_index(index)?;
            let relative = entry.enclosed_name().ok_or_else(|| ProbeError::InvalidPath {
                path: entry.name().to_string(),
            })?;
            destinations.push(relative);
        }

        if target.exists() {
            info!(target = %target.display(), "Removing existing directory");
            fs::remove_dir_all(target)?;
        }
        fs::create_dir_all(target)?;

        let pb = self.progress.create_entry_progress(zip.len() as u64);
        let mut files = 0;
        let mut bytes = 0;

        for (index, relative) in destinations.iter().enumerate() {
            let mut entry = zip.by_index(index)?;
            let destination = target.join(relative);

            if entry.is_dir() {
                fs::create_dir_all(&destination)?;
            } else {
                if let Some(parent) = destination.parent() {
                    fs::create_dir_all(parent)?;
                }
                let mut out = File::create(&destination)?;
                bytes += io::copy(&mut entry, &mut out)?;
                files += 1;

                if let Some(mode) = entry.unix_mode() {
                    restore_mode(&destination, mode)?;
                }
            }

            debug!(entry = %relative.display(), "Extracted entry");
            pb.set_message(relative.display().to_string());
            pb.inc(1);
        }

        let duration = start.elapsed();
        finish_progress_with_summary(
            &pb,
            &format!("Extracted {} entries", destinations.len()),
            duration,
        );

        Ok(ExtractionSummary {
            target: target.to_path_buf(),
            entries: destinations.len(),
            files,
            bytes,
            duration,
        })
    }
}

#[cfg(unix)]
fn restore_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o7777))?;
    Ok(())
}

#[cfg(not(unix))]
fn restore_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
