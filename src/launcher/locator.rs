use crate::config::LaunchConfig;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Searches a fixed list of locations for the project archive.
pub struct ArchiveLocator {
    archive_name: String,
    keyword: String,
    extension: String,
    locations: Vec<PathBuf>,
    search_home: bool,
}

impl ArchiveLocator {
    pub fn new(config: &LaunchConfig) -> Self {
        Self {
            archive_name: config.archive_name.to_lowercase(),
            keyword: config.archive_keyword.to_lowercase(),
            extension: config.archive_extension.clone(),
            locations: config.search_locations.clone(),
            search_home: config.search_home,
        }
    }

    /// Configured locations in search order, then the home directory.
    pub fn candidate_locations(&self) -> Vec<PathBuf> {
        let mut locations = self.locations.clone();
        if self.search_home {
            if let Some(home) = dirs::home_dir() {
                locations.push(home);
            }
        }
        locations
    }

    /// First matching file, visiting locations in order and each one in sorted walk order.
    pub fn find(&self) -> Option<PathBuf> {
        for location in self.candidate_locations() {
            if !location.exists() {
                debug!(location = %location.display(), "Search location missing");
                continue;
            }

            if let Some(found) = self.search(&location) {
                return Some(found);
            }
        }

        None
    }

    /// Whether a file name identifies the archive: the exact configured name
    /// (case-insensitively) or a name containing the keyword with the archive extension.
    pub fn matches(&self, file_name: &str) -> bool {
        let lower = file_name.to_lowercase();
        lower == self.archive_name
            || (lower.contains(&self.keyword) && file_name.ends_with(&self.extension))
    }

    fn search(&self, location: &Path) -> Option<PathBuf> {
        let walker = WalkDir::new(location)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!(error = %err, "Skipping unreadable entry during archive search");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            if let Some(name) = entry.file_name().to_str() {
                if self.matches(name) {
                    return Some(entry.into_path());
                }
            }
        }

        None
    }
}
