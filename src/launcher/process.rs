use crate::launcher::setup::LaunchCommand;
use crate::ui::InterruptGuard;
use anyhow::{bail, Context};
use std::env;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use tracing::debug;

/// Result of an install step; failures are reported and the run continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Succeeded,
    Failed { reason: String },
}

/// How the foreground application ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForegroundOutcome {
    /// Exit code, `None` when the child was ended by a signal.
    Exited(Option<i32>),
    Interrupted,
    SpawnFailed(String),
}

pub struct CommandRunner;

impl CommandRunner {
    pub fn new() -> Self {
        Self
    }

    /// Runs a setup step to completion with its output captured.
    pub fn run_step(&self, command: &LaunchCommand) -> StepOutcome {
        match run_captured(command) {
            Ok(()) => StepOutcome::Succeeded,
            Err(e) => StepOutcome::Failed {
                reason: format!("{:#}", e),
            },
        }
    }

    /// Runs the application attached to the terminal and blocks until it exits.
    pub fn run_foreground(
        &self,
        command: &LaunchCommand,
        guard: &InterruptGuard,
    ) -> ForegroundOutcome {
        let _token = guard.child_running();

        let status = match spawn_and_wait(command) {
            Ok(status) => status,
            Err(e) => return ForegroundOutcome::SpawnFailed(format!("{:#}", e)),
        };

        if guard.is_interrupted() {
            ForegroundOutcome::Interrupted
        } else {
            ForegroundOutcome::Exited(status.code())
        }
    }
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

fn run_captured(command: &LaunchCommand) -> anyhow::Result<()> {
    debug!(command = %command.display(), cwd = %command.cwd.display(), "Running setup step");

    let output = Command::new(&command.program)
        .args(&command.args)
        .current_dir(&command.cwd)
        .stdin(Stdio::null())
        .output()
        .with_context(|| format!("Failed to spawn {}", command.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let tail: Vec<&str> = stderr.lines().rev().take(5).collect();
        let tail: Vec<&str> = tail.into_iter().rev().collect();
        bail!(
            "{} exited with {}{}",
            command.display(),
            output.status,
            if tail.is_empty() {
                String::new()
            } else {
                format!(":\n{}", tail.join("\n"))
            }
        );
    }

    Ok(())
}

fn spawn_and_wait(command: &LaunchCommand) -> anyhow::Result<ExitStatus> {
    debug!(command = %command.display(), cwd = %command.cwd.display(), "Launching application");

    let mut child = Command::new(&command.program)
        .args(&command.args)
        .current_dir(&command.cwd)
        .spawn()
        .with_context(|| format!("Failed to spawn {}", command.display()))?;

    child
        .wait()
        .with_context(|| format!("Failed waiting for {}", command.display()))
}

/// The configured interpreter, else the first of `python3`/`python` on PATH,
/// else `python3`.
pub fn find_python(configured: Option<&str>) -> String {
    if let Some(python) = configured {
        return python.to_string();
    }

    ["python3", "python"]
        .iter()
        .find(|name| find_on_path(name).is_some())
        .map(|name| name.to_string())
        .unwrap_or_else(|| "python3".to_string())
}

/// Locates an executable by name in the directories of `PATH`.
pub fn find_on_path(name: &str) -> Option<PathBuf> {
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths).find_map(|dir| {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
        if cfg!(windows) {
            let exe = dir.join(format!("{}.exe", name));
            if exe.is_file() {
                return Some(exe);
            }
        }
        None
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_python_prefers_configured() {
        assert_eq!(find_python(Some("/opt/py/bin/python3.12")), "/opt/py/bin/python3.12");
    }

    #[test]
    fn test_find_python_falls_back() {
        let python = find_python(None);
        assert!(python == "python3" || python == "python");
    }

    #[test]
    fn test_missing_program_fails_step() {
        let temp_dir = TempDir::new().unwrap();
        let command = LaunchCommand::new("stackprobe-no-such-program", &["install"], temp_dir.path());

        match CommandRunner::new().run_step(&command) {
            StepOutcome::Failed { reason } => {
                assert!(reason.contains("Failed to spawn stackprobe-no-such-program install"))
            }
            StepOutcome::Succeeded => panic!("missing program should fail"),
        }
    }

    #[test]
    fn test_missing_program_fails_foreground() {
        let temp_dir = TempDir::new().unwrap();
        let command = LaunchCommand::new("stackprobe-no-such-program", &[], temp_dir.path());
        let guard = InterruptGuard::new_for_test();

        let outcome = CommandRunner::new().run_foreground(&command, &guard);
        assert!(matches!(outcome, ForegroundOutcome::SpawnFailed(_)));
        assert!(!guard.is_child_active());
    }

    #[cfg(unix)]
    #[test]
    fn test_step_exit_status() {
        let temp_dir = TempDir::new().unwrap();
        let runner = CommandRunner::new();

        let ok = LaunchCommand::new("sh", &["-c", "exit 0"], temp_dir.path());
        assert_eq!(runner.run_step(&ok), StepOutcome::Succeeded);

        let failing = LaunchCommand::new("sh", &["-c", "echo broken >&2; exit 3"], temp_dir.path());
        match runner.run_step(&failing) {
            StepOutcome::Failed { reason } => assert!(reason.contains("broken")),
            StepOutcome::Succeeded => panic!("non-zero exit should fail"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_foreground_reports_exit_code() {
        let temp_dir = TempDir::new().unwrap();
        let command = LaunchCommand::new("sh", &["-c", "exit 7"], temp_dir.path());
        let guard = InterruptGuard::new_for_test();

        let outcome = CommandRunner::new().run_foreground(&command, &guard);
        assert_eq!(outcome, ForegroundOutcome::Exited(Some(7)));
    }

    #[cfg(unix)]
    #[test]
    fn test_foreground_runs_in_cwd() {
        let temp_dir = TempDir::new().unwrap();
        let command = LaunchCommand::new("sh", &["-c", "test -f marker"], temp_dir.path());
        std::fs::write(temp_dir.path().join("marker"), "").unwrap();
        let guard = InterruptGuard::new_for_test();

        let outcome = CommandRunner::new().run_foreground(&command, &guard);
        assert_eq!(outcome, ForegroundOutcome::Exited(Some(0)));
    }
}
