use crate::error::{ProbeError, UserFriendlyError};
use crate::launcher::SetupPlan;
use crate::scanner::ProjectAnalysis;
use console::{style, Emoji, Term};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");
static PACKAGE: Emoji = Emoji("📦 ", "+ ");
static MAGNIFIER: Emoji = Emoji("🔍 ", "? ");

/// Console messages for both binaries. Info and warnings show unless quiet;
/// debug lines need `-v`.
pub struct OutputFormatter {
    term: Term,
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let term = Term::stdout();
        let use_colors = match mode {
            OutputMode::Human => term.features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            term,
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    /// Progress bars only make sense on an interactive human-mode terminal.
    pub fn wants_progress(&self) -> bool {
        self.mode == OutputMode::Human && !self.quiet && self.term.is_term()
    }

    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Success, message),
            OutputMode::Json => self.print_json_message("success", message),
            OutputMode::Plain => println!("SUCCESS: {}", message),
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Warning, message),
                OutputMode::Json => self.print_json_message("warning", message),
                OutputMode::Plain => println!("WARNING: {}", message),
            }
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    pub fn debug(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("  {}", style(message).dim());
                    } else {
                        println!("  DEBUG: {}", message);
                    }
                }
                OutputMode::Json => self.print_json_message("debug", message),
                OutputMode::Plain => println!("DEBUG: {}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", ROCKET, style(operation).bold());
                    } else {
                        println!("> {}", operation);
                    }
                }
                OutputMode::Json => self.print_json_message("operation_start", operation),
                OutputMode::Plain => println!("STARTING: {}", operation),
            }
        }
    }

    pub fn print_user_friendly_error(&self, error: &ProbeError) {
        self.error(&error.user_message());

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        eprintln!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => eprintln!("SUGGESTION: {}", suggestion),
            }
        }
    }

    pub fn print_header(&self, title: &str) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}", style(title).bold().cyan());
                    println!("{}", style("=".repeat(title.chars().count())).dim());
                } else {
                    println!("{}", title);
                    println!("{}", "=".repeat(title.chars().count()));
                }
            }
            OutputMode::Json => {
                self.print_json_object(&serde_json::json!({
                    "type": "header",
                    "title": title
                }));
            }
            OutputMode::Plain => println!("=== {} ===", title),
        }
    }

    pub fn print_analysis_summary(&self, analysis: &ProjectAnalysis, report_path: &Path) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}{}", MAGNIFIER, style(&analysis.project_name).bold());
                } else {
                    println!("{}", analysis.project_name);
                }
                for line in analysis.display_summary().lines().skip(1) {
                    println!("{}", line);
                }
                println!("  Time taken: {}", format_duration(analysis.duration));
            }
            OutputMode::Json => {
                self.print_json_object(&serde_json::json!({
                    "type": "analysis",
                    "report_path": report_path.display().to_string(),
                    "duration_ms": analysis.duration.as_millis() as u64,
                    "analysis": analysis,
                    "timestamp": chrono::Utc::now().to_rfc3339()
                }));
            }
            OutputMode::Plain => {
                println!("{}", analysis.display_summary());
                println!("Duration: {:?}", analysis.duration);
            }
        }
    }

    /// Prints the install and launch commands. Plan notes are reported by the
    /// launcher as info or warning messages.
    pub fn print_setup_plan(&self, plan: &SetupPlan) {
        if self.quiet {
            return;
        }

        let install: Vec<String> = plan.install_steps.iter().map(|s| s.display()).collect();
        let launch = plan.launch.as_ref().map(|c| c.display());

        match self.mode {
            OutputMode::Human | OutputMode::Plain => {
                for step in &install {
                    if self.use_colors {
                        println!("{}{}", PACKAGE, style(step).dim());
                    } else {
                        println!("  install: {}", step);
                    }
                }
                match &launch {
                    Some(command) if self.use_colors => {
                        println!("{}{}", ROCKET, style(command).bold())
                    }
                    Some(command) => println!("  launch: {}", command),
                    None => println!("  launch: (none)"),
                }
            }
            OutputMode::Json => {
                self.print_json_object(&serde_json::json!({
                    "type": "plan",
                    "install": install,
                    "launch": launch,
                }));
            }
        }
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        if self.use_colors {
            let (emoji, styled) = match msg_type {
                MessageType::Success => (CHECKMARK, style(message).green().bold()),
                MessageType::Error => (CROSS, style(message).red().bold()),
                MessageType::Warning => (WARNING, style(message).yellow().bold()),
                MessageType::Info => (INFO, style(message).cyan()),
            };

            match msg_type {
                MessageType::Error => eprintln!("{}{}", emoji, styled),
                _ => println!("{}{}", emoji, styled),
            }
        } else {
            let prefix = match msg_type {
                MessageType::Success => "✓",
                MessageType::Error => "✗",
                MessageType::Warning => "!",
                MessageType::Info => "i",
            };

            match msg_type {
                MessageType::Error => eprintln!("{} {}", prefix, message),
                _ => println!("{} {}", prefix, message),
            }
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}

pub(crate) fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}s", secs)
    } else {
        format!("{}ms", duration.as_millis())
    }
}
