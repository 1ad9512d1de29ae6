use clap::Parser;
use stackprobe::{
    generate_sample_config, init_logging, write_project_report, AnalyzeCli, OutputFormatter,
    OutputMode, ProbeError, UserFriendlyError,
};
use std::path::PathBuf;
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = AnalyzeCli::parse();
    init_logging(cli.verbosity_level());

    // clap only lets `directory` be absent alongside --generate-config.
    let directory = match cli.directory.as_deref() {
        Some(directory) if !cli.generate_config => directory,
        _ => return handle_generate_config(cli.config.clone()),
    };

    let formatter = OutputFormatter::new(OutputMode::from(cli.output_format), cli.verbose, cli.quiet);

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            formatter.print_user_friendly_error(&e);
            return 1;
        }
    };

    formatter.info(&format!("Analyzing project in '{}'...", directory.display()));

    match write_project_report(&config.scan, directory) {
        Ok((analysis, report_path)) => {
            formatter.print_analysis_summary(&analysis, &report_path);
            formatter.success(&format!(
                "Analysis complete! Report saved to {}",
                report_path.display()
            ));
            0
        }
        Err(e) => {
            formatter.print_user_friendly_error(&e);
            match e {
                ProbeError::DirectoryNotFound { .. } | ProbeError::NotADirectory { .. } => 2,
                _ => 1,
            }
        }
    }
}

fn handle_generate_config(path: Option<PathBuf>) -> i32 {
    let config_path = path.unwrap_or_else(|| PathBuf::from("stackprobe.toml"));

    match generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path.display());
            println!("\nTo use this configuration:");
            println!("  analyze-project <directory> --config {}", config_path.display());
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}
