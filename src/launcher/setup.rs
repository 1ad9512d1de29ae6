use crate::config::LaunchConfig;
use crate::launcher::kind::ProjectKind;
use crate::scanner::facets::start_script;
use crate::scanner::rules::{DJANGO_MANAGE_FILE, NODE_ENTRY_FILES, PYTHON_ENTRY_FILES};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

const VENV_DIRS: &[&str] = &["venv", "env", ".venv", ".env"];

/// A program, its arguments and the directory it runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    /// Used instead of `program` when `program` is a path that does not exist at run time.
    pub fallback_program: Option<String>,
}

impl LaunchCommand {
    pub fn new<S: Into<String>>(program: S, args: &[&str], cwd: &Path) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            cwd: cwd.to_path_buf(),
            fallback_program: None,
        }
    }

    pub fn with_fallback<S: Into<String>>(mut self, program: S) -> Self {
        self.fallback_program = Some(program.into());
        self
    }

    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(|a| a.as_str()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The command actually run: the fallback replaces a missing program path.
    pub fn resolved(&self) -> LaunchCommand {
        match &self.fallback_program {
            Some(fallback) if !Path::new(&self.program).exists() => LaunchCommand {
                program: fallback.clone(),
                fallback_program: None,
                ..self.clone()
            },
            _ => self.clone(),
        }
    }
}

/// What to install and what to run for one extracted project.
#[derive(Debug, Clone)]
pub struct SetupPlan {
    pub kind: ProjectKind,
    pub install_steps: Vec<LaunchCommand>,
    pub launch: Option<LaunchCommand>,
    pub notes: Vec<String>,
}

impl SetupPlan {
    fn new(kind: ProjectKind) -> Self {
        Self {
            kind,
            install_steps: Vec::new(),
            launch: None,
            notes: Vec::new(),
        }
    }
}

pub struct ProjectSetup {
    python: String,
    static_port: u16,
    django_address: String,
}

impl ProjectSetup {
    pub fn new(config: &LaunchConfig, python: String) -> Self {
        Self {
            python,
            static_port: config.static_port,
            django_address: config.django_address.clone(),
        }
    }

    pub fn plan(&self, kind: ProjectKind, dir: &Path) -> SetupPlan {
        match kind {
            ProjectKind::Node => self.plan_node(dir),
            ProjectKind::Python => self.plan_python(dir),
            ProjectKind::Static | ProjectKind::Unknown => self.plan_static(kind, dir),
        }
    }

    fn plan_node(&self, dir: &Path) -> SetupPlan {
        let mut plan = SetupPlan::new(ProjectKind::Node);
        plan.install_steps
            .push(LaunchCommand::new(npm_program(), &["install"], dir));

        let manifest_path = dir.join("package.json");
        if manifest_path.exists() {
            let parsed = fs::read_to_string(&manifest_path)
                .map_err(|e| e.to_string())
                .and_then(|content| {
                    serde_json::from_str::<serde_json::Value>(&content).map_err(|e| e.to_string())
                });

            match parsed {
                Ok(manifest) => {
                    if let Some(script) = start_script(&manifest) {
                        plan.notes.push(format!("Found start script: {}", script));
                        plan.launch = Some(LaunchCommand::new(npm_program(), &["start"], dir));
                        return plan;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Could not parse package.json");
                    plan.notes.push("Could not parse package.json".to_string());
                }
            }
        }

        if let Some(file) = first_existing(dir, NODE_ENTRY_FILES) {
            plan.notes.push(format!("Found server file: {}", file));
            plan.launch = Some(LaunchCommand::new("node", &[file], dir));
        } else {
            plan.notes
                .push("Could not determine how to start the Node.js application".to_string());
        }

        plan
    }

    fn plan_python(&self, dir: &Path) -> SetupPlan {
        let mut plan = SetupPlan::new(ProjectKind::Python);
        let mut interpreter = LaunchCommand::new(self.python.as_str(), &[], dir);

        if dir.join("requirements.txt").exists() {
            let venv_exists = VENV_DIRS.iter().any(|name| dir.join(name).is_dir());

            if venv_exists {
                plan.install_steps.push(LaunchCommand::new(
                    "pip",
                    &["install", "-r", "requirements.txt"],
                    dir,
                ));
            } else {
                plan.notes.push("Creating virtual environment in venv".to_string());
                plan.install_steps.push(LaunchCommand::new(
                    self.python.as_str(),
                    &["-m", "venv", "venv"],
                    dir,
                ));
                let pip = venv_tool(dir, "pip");
                plan.install_steps.push(LaunchCommand::new(
                    pip.display().to_string(),
                    &["install", "-r", "requirements.txt"],
                    dir,
                ));
                interpreter = LaunchCommand::new(venv_tool(dir, "python").display().to_string(), &[], dir)
                    .with_fallback(self.python.as_str());
            }
        }

        if let Some(file) = first_existing(dir, PYTHON_ENTRY_FILES) {
            plan.notes.push(format!("Found server file: {}", file));
            interpreter.args = vec![file.to_string()];
            plan.launch = Some(interpreter);
        } else if dir.join(DJANGO_MANAGE_FILE).exists() {
            plan.notes.push("Found Django project".to_string());
            interpreter.args = vec![
                DJANGO_MANAGE_FILE.to_string(),
                "runserver".to_string(),
                self.django_address.clone(),
            ];
            plan.launch = Some(interpreter);
        } else {
            plan.notes
                .push("Could not determine how to start the Python application".to_string());
        }

        plan
    }

    fn plan_static(&self, kind: ProjectKind, dir: &Path) -> SetupPlan {
        let mut plan = SetupPlan::new(kind);
        if kind == ProjectKind::Unknown {
            plan.notes.push(
                "Could not determine project type. Assuming it's a static web project.".to_string(),
            );
        }

        let port = self.static_port.to_string();
        plan.launch = Some(LaunchCommand::new(
            self.python.as_str(),
            &["-m", "http.server", port.as_str()],
            dir,
        ));
        plan
    }
}

fn first_existing(dir: &Path, candidates: &[&'static str]) -> Option<&'static str> {
    candidates
        .iter()
        .copied()
        .find(|name| dir.join(name).is_file())
}

fn npm_program() -> &'static str {
    if cfg!(windows) {
        "npm.cmd"
    } else {
        "npm"
    }
}

/// Path of an executable inside the `venv` directory this tool creates.
fn venv_tool(dir: &Path, tool: &str) -> PathBuf {
    if cfg!(windows) {
        dir.join("venv").join("Scripts").join(tool)
    } else {
        dir.join("venv").join("bin").join(tool)
    }
}
