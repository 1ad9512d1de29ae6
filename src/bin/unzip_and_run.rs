use clap::Parser;
use stackprobe::{
    generate_sample_config, init_logging, InterruptGuard, LaunchCli, Launcher, OutputFormatter,
    OutputMode, ProbeError, ProgressManager, UserFriendlyError,
};
use std::path::PathBuf;
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = LaunchCli::parse();
    init_logging(cli.verbosity_level());

    if cli.generate_config {
        return handle_generate_config(cli.config.clone());
    }

    let formatter = OutputFormatter::new(OutputMode::from(cli.output_format), cli.verbose, cli.quiet);

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            formatter.print_user_friendly_error(&e);
            return 1;
        }
    };

    let guard = match InterruptGuard::new() {
        Ok(guard) => guard,
        Err(e) => {
            formatter.print_user_friendly_error(&e);
            return 1;
        }
    };
    let progress = ProgressManager::new(formatter.wants_progress());

    let launcher = Launcher::new(&config, &formatter, &progress, &guard).with_dry_run(cli.dry_run);

    match launcher.run() {
        Ok(_) => 0,
        Err(e) => {
            progress.clear();
            formatter.print_user_friendly_error(&e);
            exit_code_for(&e)
        }
    }
}

fn exit_code_for(error: &ProbeError) -> i32 {
    match error {
        ProbeError::Cancelled => 130,
        ProbeError::ArchiveNotFound { .. } => 3,
        _ => 1,
    }
}

fn handle_generate_config(path: Option<PathBuf>) -> i32 {
    let config_path = path.unwrap_or_else(|| PathBuf::from("stackprobe.toml"));

    match generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path.display());
            println!("\nTo use this configuration:");
            println!("  unzip-and-run --config {}", config_path.display());
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
