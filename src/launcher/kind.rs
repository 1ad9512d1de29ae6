use crate::error::Result;
use std::fmt;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    Node,
    Python,
    Static,
    /// Nothing recognisable at the top level. Served as static files.
    Unknown,
}

impl ProjectKind {
    /// Classifies an extracted project by its top-level marker files.
    pub fn detect(dir: &Path) -> Result<Self> {
        if dir.join("package.json").exists() || dir.join("node_modules").exists() {
            return Ok(ProjectKind::Node);
        }

        let top_level = top_level_files(dir)?;
        let has_ext = |ext: &str| top_level.iter().any(|name| name.ends_with(ext));

        if dir.join("requirements.txt").exists() || dir.join("setup.py").exists() || has_ext(".py")
        {
            return Ok(ProjectKind::Python);
        }

        if has_ext(".html") && has_ext(".js") {
            return Ok(ProjectKind::Static);
        }

        Ok(ProjectKind::Unknown)
    }

    pub fn launches_as_static(&self) -> bool {
        matches!(self, ProjectKind::Static | ProjectKind::Unknown)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProjectKind::Node => "Node.js",
            ProjectKind::Python => "Python",
            ProjectKind::Static => "static web",
            ProjectKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn top_level_files(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.path().is_file() {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn detect_with(files: &[&str]) -> ProjectKind {
        let temp_dir = TempDir::new().unwrap();
        for file in files {
            fs::write(temp_dir.path().join(file), "").unwrap();
        }
        ProjectKind::detect(temp_dir.path()).unwrap()
    }

    #[test]
    fn test_node_wins_over_python() {
        assert_eq!(detect_with(&["package.json", "app.py"]), ProjectKind::Node);
    }

    #[test]
    fn test_node_modules_marks_node() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("node_modules")).unwrap();
        assert_eq!(ProjectKind::detect(temp_dir.path()).unwrap(), ProjectKind::Node);
    }

    #[test]
    fn test_python_markers() {
        assert_eq!(detect_with(&["requirements.txt"]), ProjectKind::Python);
        assert_eq!(detect_with(&["setup.py"]), ProjectKind::Python);
        assert_eq!(detect_with(&["tool.py", "index.html"]), ProjectKind::Python);
    }

    #[test]
    fn test_static_needs_html_and_js() {
        assert_eq!(detect_with(&["index.html", "main.js"]), ProjectKind::Static);
        assert_eq!(detect_with(&["index.html"]), ProjectKind::Unknown);
    }

    #[test]
    fn test_unknown_launches_as_static() {
        let kind = detect_with(&["README.md"]);
        assert_eq!(kind, ProjectKind::Unknown);
        assert!(kind.launches_as_static());
        assert!(!ProjectKind::Python.launches_as_static());
    }

    #[test]
    fn test_nested_python_file_is_not_a_marker() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("scripts")).unwrap();
        fs::write(temp_dir.path().join("scripts").join("tool.py"), "").unwrap();
        assert_eq!(
            ProjectKind::detect(temp_dir.path()).unwrap(),
            ProjectKind::Unknown
        );
    }
}
