use crate::config::{CliOverrides, Config};
use crate::error::Result;
use crate::ui::OutputMode;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "analyze-project")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Analyze a project directory and write PROJECT_ANALYSIS.md next to it")]
#[command(
    long_about = "Walks a project directory, detects languages, frameworks, entry points, \
                  routes, database and i18n usage, and writes a Markdown report to the \
                  directory's parent."
)]
#[command(after_help = "EXAMPLES:\n  \
    analyze-project ./multilingua_app\n  \
    analyze-project ./my_app --output-format json\n  \
    analyze-project ./my_app --config stackprobe.toml")]
pub struct AnalyzeCli {
    /// Project directory to analyze
    #[arg(required_unless_present = "generate_config")]
    pub directory: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for console messages
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Maximum number of routes listed in the report
    #[arg(long)]
    pub route_limit: Option<usize>,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Parser, Debug)]
#[command(name = "unzip-and-run")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Find the project archive, extract it, install dependencies and run it")]
#[command(after_help = "EXAMPLES:\n  \
    unzip-and-run\n  \
    unzip-and-run --skip-install\n  \
    unzip-and-run --dry-run -v")]
pub struct LaunchCli {
    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for console messages
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Do not install dependencies before launching
    #[arg(long)]
    pub skip_install: bool,

    /// Do not analyze the extracted project before launching
    #[arg(long)]
    pub skip_analysis: bool,

    /// Locate the archive and print the plan without extracting or launching
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl From<OutputFormat> for OutputMode {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        }
    }
}

impl AnalyzeCli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = CliOverrides::new().with_route_limit(self.route_limit);
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

impl LaunchCli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = CliOverrides::new()
            .with_skip_install(self.skip_install)
            .with_skip_analysis(self.skip_analysis);
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}
