use crate::config::ScanConfig;
use crate::error::Result;
use crate::report::tree::render_tree;
use crate::scanner::facets;
use crate::scanner::walker::ProjectWalker;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Everything the scanner learned about one project directory.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectAnalysis {
    pub root: PathBuf,
    pub project_name: String,
    pub extensions: BTreeMap<String, usize>,
    pub frameworks: BTreeSet<String>,
    pub languages: BTreeSet<String>,
    pub entry_points: Vec<String>,
    pub important_files: Vec<String>,
    pub api_routes: Vec<String>,
    pub database_info: Vec<String>,
    pub multilingual_features: Vec<String>,
    pub file_tree: String,
    pub has_package_json: bool,
    pub duration: Duration,
}

impl ProjectAnalysis {
    pub fn has_language(&self, language: &str) -> bool {
        facets::mentions_language(&self.languages, language)
    }

    pub fn has_framework(&self, framework: &str) -> bool {
        self.frameworks.contains(framework)
    }

    /// Node.js instructions apply to projects with a manifest or JavaScript sources.
    pub fn is_node_project(&self) -> bool {
        self.has_package_json || self.has_language("JavaScript") || self.has_language("TypeScript")
    }

    pub fn display_summary(&self) -> String {
        format!(
            "Project: {}\n  Files counted: {}\n  Frameworks: {}\n  Entry points: {}\n  Routes: {}\n  Database hints: {}\n  Multilingual hints: {}",
            self.project_name,
            self.extensions.values().sum::<usize>(),
            self.frameworks.len(),
            self.entry_points.len(),
            self.api_routes.len(),
            self.database_info.len(),
            self.multilingual_features.len(),
        )
    }
}

pub struct ProjectScanner {
    config: ScanConfig,
}

impl ProjectScanner {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn analyze<P: AsRef<Path>>(&self, directory: P) -> Result<ProjectAnalysis> {
        let start = Instant::now();
        let root = directory.as_ref();
        let walker = ProjectWalker::new(root, &self.config);
        walker.validate_root()?;

        info!(root = %root.display(), "Starting project analysis");

        let extensions = facets::count_extensions(&walker);
        let frameworks = facets::detect_frameworks(&walker);
        let languages = facets::identify_languages(&extensions);
        let entry_points = facets::find_entry_points(&walker);
        let important_files = facets::find_important_files(&walker);
        let api_routes = facets::find_api_routes(&walker);
        let database_info = facets::find_database_config(&walker);
        let multilingual_features = facets::analyze_multilingual_features(&walker);

        let file_tree = match render_tree(
            root,
            self.config.tree_max_depth,
            self.config.tree_max_files,
        ) {
            Ok(tree) => tree,
            Err(e) => format!("Error generating file tree: {}\n", e),
        };

        let analysis = ProjectAnalysis {
            root: root.to_path_buf(),
            project_name: project_name(root),
            extensions,
            frameworks,
            languages,
            entry_points,
            important_files,
            api_routes,
            database_info,
            multilingual_features,
            file_tree,
            has_package_json: walker.top_level_exists("package.json"),
            duration: start.elapsed(),
        };

        debug!(
            frameworks = analysis.frameworks.len(),
            routes = analysis.api_routes.len(),
            elapsed_ms = analysis.duration.as_millis() as u64,
            "Project analysis finished"
        );

        Ok(analysis)
    }
}

/// Display name for a project root: its last path component, or the
/// canonical directory name for paths such as `.`.
pub fn project_name(root: &Path) -> String {
    let named = root
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .filter(|n| !n.is_empty());

    named
        .or_else(|| {
            root.canonicalize()
                .ok()
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
        })
        .unwrap_or_else(|| "Project".to_string())
}
