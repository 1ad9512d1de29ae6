use crate::error::{ProbeError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub scan: ScanConfig,
    pub launch: LaunchConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanConfig {
    pub report_file_name: String,
    pub route_limit: usize,
    pub tree_max_depth: usize,
    pub tree_max_files: usize,
    pub exclude_dirs: Vec<String>,
    pub max_file_size: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LaunchConfig {
    pub archive_name: String,
    pub archive_keyword: String,
    pub archive_extension: String,
    pub extract_dir: PathBuf,
    pub search_locations: Vec<PathBuf>,
    pub search_home: bool,
    pub static_port: u16,
    pub django_address: String,
    pub install_dependencies: bool,
    pub analyze_before_launch: bool,
    pub python: Option<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            report_file_name: "PROJECT_ANALYSIS.md".to_string(),
            route_limit: 20,
            tree_max_depth: 3,
            tree_max_files: 5,
            exclude_dirs: vec![
                ".git".to_string(),
                "node_modules".to_string(),
                "__pycache__".to_string(),
            ],
            max_file_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            archive_name: "Multilingua-lartikonj-patch-1.zip".to_string(),
            archive_keyword: "multilingua".to_string(),
            archive_extension: ".zip".to_string(),
            extract_dir: PathBuf::from("multilingua_app"),
            search_locations: vec![
                PathBuf::from("."),
                PathBuf::from("./attached_assets"),
                PathBuf::from("./uploads"),
                PathBuf::from("./downloads"),
                PathBuf::from("./assets"),
            ],
            search_home: true,
            static_port: 5000,
            django_address: "0.0.0.0:8000".to_string(),
            install_dependencies: true,
            analyze_before_launch: true,
            python: None,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ProbeError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ProbeError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ProbeError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["stackprobe.toml", ".stackprobe.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(route_limit) = cli_args.route_limit {
            self.scan.route_limit = route_limit;
        }

        if cli_args.skip_install {
            self.launch.install_dependencies = false;
        }

        if cli_args.skip_analysis {
            self.launch.analyze_before_launch = false;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| ProbeError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| ProbeError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.scan.report_file_name.trim().is_empty() {
            return Err(ProbeError::Config {
                message: "Report file name must not be empty".to_string(),
            });
        }

        if self.scan.route_limit == 0 {
            return Err(ProbeError::Config {
                message: "Route limit must be greater than 0".to_string(),
            });
        }

        if self.scan.tree_max_files == 0 {
            return Err(ProbeError::Config {
                message: "Files listed per directory must be greater than 0".to_string(),
            });
        }

        if self.launch.archive_name.trim().is_empty() {
            return Err(ProbeError::Config {
                message: "Archive name must not be empty".to_string(),
            });
        }

        if self.launch.extract_dir.as_os_str().is_empty() {
            return Err(ProbeError::Config {
                message: "Extraction directory must not be empty".to_string(),
            });
        }

        if self.launch.static_port == 0 {
            return Err(ProbeError::Config {
                message: "Static server port must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub route_limit: Option<usize>,
    pub skip_install: bool,
    pub skip_analysis: bool,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route_limit(mut self, route_limit: Option<usize>) -> Self {
        self.route_limit = route_limit;
        self
    }

    pub fn with_skip_install(mut self, skip: bool) -> Self {
        self.skip_install = skip;
        self
    }

    pub fn with_skip_analysis(mut self, skip: bool) -> Self {
        self.skip_analysis = skip;
        self
    }
}
