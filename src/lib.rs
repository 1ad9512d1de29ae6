pub mod cli;
pub mod config;
pub mod error;
pub mod launcher;
pub mod logging;
pub mod report;
pub mod scanner;
pub mod ui;

pub use cli::{AnalyzeCli, LaunchCli, OutputFormat};
pub use config::{CliOverrides, Config, LaunchConfig, ScanConfig};
pub use error::{ProbeError, Result, UserFriendlyError};
pub use launcher::{LaunchOutcome, Launcher, ProjectKind};
pub use logging::init_logging;
pub use report::ReportWriter;
pub use scanner::{ProjectAnalysis, ProjectScanner};
pub use ui::{InterruptGuard, OutputFormatter, OutputMode, ProgressManager};

use std::path::{Path, PathBuf};

/// Analyzes `directory` and writes the Markdown report next to it.
/// Nothing is written when the analysis fails.
pub fn write_project_report(
    config: &ScanConfig,
    directory: &Path,
) -> Result<(ProjectAnalysis, PathBuf)> {
    let analysis = ProjectScanner::new(config).analyze(directory)?;
    let markdown = report::render(&analysis, config.route_limit);
    let path = ReportWriter::new(config).write(directory, &markdown)?;
    Ok((analysis, path))
}

/// Writes a configuration file holding the default settings.
pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
    Config::default().save_to_file(output_path)
}
