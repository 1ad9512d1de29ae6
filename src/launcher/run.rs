use crate::config::Config;
use crate::error::{ProbeError, Result};
use crate::launcher::extract::ArchiveExtractor;
use crate::launcher::kind::ProjectKind;
use crate::launcher::locator::ArchiveLocator;
use crate::launcher::process::{find_python, CommandRunner, ForegroundOutcome, StepOutcome};
use crate::launcher::setup::{ProjectSetup, SetupPlan};
use crate::ui::output::format_duration;
use crate::ui::{InterruptGuard, OutputFormatter, ProgressManager};
use crate::write_project_report;
use std::path::{Path, PathBuf};
use tracing::info;

/// How a launcher run ended when nothing went wrong along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    DryRun { archive: PathBuf, entries: usize },
    NoLaunchCommand,
    Finished(ForegroundOutcome),
}

/// Locates, extracts, prepares and runs the archived project.
pub struct Launcher<'a> {
    config: &'a Config,
    output: &'a OutputFormatter,
    progress: &'a ProgressManager,
    guard: &'a InterruptGuard,
    runner: CommandRunner,
    dry_run: bool,
}

impl<'a> Launcher<'a> {
    pub fn new(
        config: &'a Config,
        output: &'a OutputFormatter,
        progress: &'a ProgressManager,
        guard: &'a InterruptGuard,
    ) -> Self {
        Self {
            config,
            output,
            progress,
            guard,
            runner: CommandRunner::new(),
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn run(&self) -> Result<LaunchOutcome> {
        let launch = &self.config.launch;
        self.output.print_header(&format!(
            "{} Web Application Setup",
            capitalize(&launch.archive_keyword)
        ));

        let archive = self.locate()?;
        self.guard.check_interrupted()?;

        if self.dry_run {
            let entries = ArchiveExtractor::list_entries(&archive)?;
            self.output.info(&format!(
                "Dry run: would extract {} entries from {} to {}",
                entries.len(),
                archive.display(),
                launch.extract_dir.display()
            ));
            return Ok(LaunchOutcome::DryRun {
                archive,
                entries: entries.len(),
            });
        }

        let project_dir = self.extract(&archive)?;
        self.guard.check_interrupted()?;

        let plan = self.plan(&project_dir)?;
        self.install(&plan)?;

        let Some(command) = plan.launch.as_ref() else {
            self.output
                .error("Failed to determine how to start the application.");
            self.output
                .info("Please check the README.md for manual instructions.");
            return Ok(LaunchOutcome::NoLaunchCommand);
        };

        if launch.analyze_before_launch {
            self.analyze(&project_dir);
        }
        self.guard.check_interrupted()?;

        let command = command.resolved();
        self.output.start_operation(&format!(
            "Starting application with command: {}",
            command.display()
        ));
        let outcome = self.runner.run_foreground(&command, self.guard);
        self.report_outcome(&outcome);

        Ok(LaunchOutcome::Finished(outcome))
    }

    fn locate(&self) -> Result<PathBuf> {
        self.output.info("Searching for the zip file...");
        let locator = ArchiveLocator::new(&self.config.launch);

        match locator.find() {
            Some(path) => {
                self.output
                    .info(&format!("Found zip file at: {}", path.display()));
                Ok(path)
            }
            None => Err(ProbeError::ArchiveNotFound {
                name: self.config.launch.archive_name.clone(),
                searched: locator
                    .candidate_locations()
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect(),
            }),
        }
    }

    fn extract(&self, archive: &Path) -> Result<PathBuf> {
        let target = &self.config.launch.extract_dir;
        self.output.info(&format!(
            "Extracting {} to {}...",
            archive.display(),
            target.display()
        ));

        let summary = ArchiveExtractor::new(self.progress).extract(archive, target)?;
        self.progress.clear();
        info!(
            files = summary.files,
            bytes = summary.bytes,
            elapsed_ms = summary.duration.as_millis() as u64,
            "Archive extracted"
        );
        self.output.success(&format!(
            "Successfully extracted {} entries ({} files, {} bytes) to {} in {}",
            summary.entries,
            summary.files,
            summary.bytes,
            summary.target.display(),
            format_duration(summary.duration)
        ));

        Ok(summary.target.canonicalize()?)
    }

    fn plan(&self, project_dir: &Path) -> Result<SetupPlan> {
        self.output.info("Detecting project type...");
        let kind = ProjectKind::detect(project_dir)?;
        if kind != ProjectKind::Unknown {
            self.output.info(&format!("Detected {} project", kind));
        }

        let python = find_python(self.config.launch.python.as_deref());
        let plan = ProjectSetup::new(&self.config.launch, python).plan(kind, project_dir);
        info!(kind = %kind, steps = plan.install_steps.len(), "Setup planned");

        self.output
            .info(&format!("Setting up {} project...", kind));
        for note in &plan.notes {
            if kind == ProjectKind::Unknown && note.starts_with("Could not determine project type") {
                self.output.warning(note);
            } else {
                self.output.info(note);
            }
        }
        self.output.print_setup_plan(&plan);

        Ok(plan)
    }

    fn install(&self, plan: &SetupPlan) -> Result<()> {
        if plan.install_steps.is_empty() {
            return Ok(());
        }

        if !self.config.launch.install_dependencies {
            self.output.info("Skipping dependency installation");
            return Ok(());
        }

        self.output.info("Installing dependencies...");
        for step in &plan.install_steps {
            self.guard.check_interrupted()?;

            let spinner = self
                .progress
                .create_spinner(&format!("Running {}", step.display()));
            let outcome = self.runner.run_step(step);
            spinner.finish_and_clear();

            if let StepOutcome::Failed { reason } = outcome {
                self.output.warning(
                    "Failed to install dependencies. The application may not run correctly.",
                );
                self.output.debug(&reason);
                return Ok(());
            }
        }

        self.output.success("Dependencies installed successfully");
        Ok(())
    }

    /// Writes the project report; any failure is only a warning.
    fn analyze(&self, project_dir: &Path) {
        self.output.info("Analyzing project structure...");

        let written = write_project_report(&self.config.scan, project_dir);

        match written {
            Ok((_, path)) => self
                .output
                .success(&format!("Analysis complete! Report saved to {}", path.display())),
            Err(e) => self
                .output
                .warning(&format!("Failed to analyze project: {}", e)),
        }
    }

    fn report_outcome(&self, outcome: &ForegroundOutcome) {
        match outcome {
            ForegroundOutcome::Interrupted => self.output.info("Application stopped by user"),
            ForegroundOutcome::Exited(Some(0)) => self.output.success("Application exited"),
            ForegroundOutcome::Exited(Some(code)) => self
                .output
                .warning(&format!("Application exited with code {}", code)),
            ForegroundOutcome::Exited(None) => {
                self.output.warning("Application was terminated by a signal")
            }
            ForegroundOutcome::SpawnFailed(reason) => self
                .output
                .error(&format!("Error running application: {}", reason)),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LaunchConfig;
    use crate::ui::OutputMode;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    struct Fixture {
        _temp_dir: TempDir,
        root: PathBuf,
        config: Config,
        output: OutputFormatter,
        progress: ProgressManager,
        guard: InterruptGuard,
    }

    fn fixture() -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().to_path_buf();
        fs::create_dir(root.join("uploads")).unwrap();

        let config = Config {
            launch: LaunchConfig {
                search_locations: vec![root.join("uploads")],
                search_home: false,
                extract_dir: root.join("multilingua_app"),
                install_dependencies: false,
                ..LaunchConfig::default()
            },
            ..Config::default()
        };

        Fixture {
            _temp_dir: temp_dir,
            root,
            config,
            output: OutputFormatter::new(OutputMode::Plain, 0, true),
            progress: ProgressManager::new(false),
            guard: InterruptGuard::new_for_test(),
        }
    }

    fn write_archive(path: &Path, entries: &[(&str, &str)]) {
        let mut writer = ZipWriter::new(File::create(path).unwrap());
        for (name, content) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    impl Fixture {
        fn launcher(&self) -> Launcher<'_> {
            Launcher::new(&self.config, &self.output, &self.progress, &self.guard)
        }
    }

    #[test]
    fn test_missing_archive_leaves_no_extraction_dir() {
        let f = fixture();

        let result = f.launcher().run();

        match result {
            Err(ProbeError::ArchiveNotFound { name, searched }) => {
                assert_eq!(name, "Multilingua-lartikonj-patch-1.zip");
                assert_eq!(searched.len(), 1);
            }
            other => panic!("expected ArchiveNotFound, got {:?}", other),
        }
        assert!(!f.root.join("multilingua_app").exists());
    }

    #[test]
    fn test_dry_run_does_not_extract() {
        let f = fixture();
        let archive = f.root.join("uploads").join("multilingua.zip");
        write_archive(&archive, &[("index.html", ""), ("main.js", "")]);

        let outcome = f.launcher().with_dry_run(true).run().unwrap();

        assert_eq!(
            outcome,
            LaunchOutcome::DryRun {
                archive,
                entries: 2
            }
        );
        assert!(!f.root.join("multilingua_app").exists());
    }

    #[test]
    fn test_no_launch_command_after_extraction() {
        let f = fixture();
        write_archive(
            &f.root.join("uploads").join("Multilingua-lartikonj-patch-1.zip"),
            &[("package.json", "{}")],
        );

        let outcome = f.launcher().run().unwrap();

        assert_eq!(outcome, LaunchOutcome::NoLaunchCommand);
        assert!(f.root.join("multilingua_app").join("package.json").is_file());
        assert!(!f.root.join("PROJECT_ANALYSIS.md").exists());
    }

    #[test]
    fn test_interrupt_before_extraction_cancels() {
        let f = fixture();
        write_archive(
            &f.root.join("uploads").join("multilingua.zip"),
            &[("index.html", "")],
        );
        f.guard.request_interrupt();

        let result = f.launcher().run();
        assert!(matches!(result, Err(ProbeError::Cancelled)));
        assert!(!f.root.join("multilingua_app").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_full_run_analyzes_then_launches() {
        let mut f = fixture();
        // `sh app.py` stands in for the interpreter so the launched "app" exits at once.
        f.config.launch.python = Some("sh".to_string());
        write_archive(
            &f.root.join("uploads").join("multilingua.zip"),
            &[("app.py", "exit 0\n"), ("README.md", "# demo\n")],
        );

        let outcome = f.launcher().run().unwrap();

        assert_eq!(
            outcome,
            LaunchOutcome::Finished(ForegroundOutcome::Exited(Some(0)))
        );
        let report = fs::read_to_string(f.root.join("PROJECT_ANALYSIS.md")).unwrap();
        assert!(report.starts_with("# multilingua_app Project Analysis"));
        assert!(report.contains("- app.py"));
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_install_is_a_warning() {
        let mut f = fixture();
        // `sh -m venv venv` fails, so the pip step never runs.
        f.config.launch.python = Some("sh".to_string());
        f.config.launch.install_dependencies = true;
        write_archive(
            &f.root.join("uploads").join("multilingua.zip"),
            &[("requirements.txt", "flask\n"), ("app.py", "exit 0\n")],
        );

        let outcome = f.launcher().run().unwrap();

        assert_eq!(
            outcome,
            LaunchOutcome::Finished(ForegroundOutcome::Exited(Some(0)))
        );
        assert!(!f.root.join("multilingua_app").join("venv").exists());
        let report = fs::read_to_string(f.root.join("PROJECT_ANALYSIS.md")).unwrap();
        assert!(report.contains("- requirements.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_analysis_still_launches() {
        let mut f = fixture();
        f.config.launch.python = Some("sh".to_string());
        // A directory in the report's place makes the write fail.
        fs::create_dir(f.root.join("PROJECT_ANALYSIS.md")).unwrap();
        write_archive(
            &f.root.join("uploads").join("multilingua.zip"),
            &[("app.py", "exit 0\n")],
        );

        let outcome = f.launcher().run().unwrap();

        assert_eq!(
            outcome,
            LaunchOutcome::Finished(ForegroundOutcome::Exited(Some(0)))
        );
        assert!(f.root.join("PROJECT_ANALYSIS.md").is_dir());
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("multilingua"), "Multilingua");
        assert_eq!(capitalize(""), "");
    }
}
