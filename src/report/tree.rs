use std::fs;
use std::io;
use std::path::Path;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE_INDENT: &str = "│   ";
const SPACE_INDENT: &str = "    ";

/// Renders an ASCII tree of `root`: directories first, then files, both sorted.
/// Hidden entries are left out, directories deeper than `max_depth` are not
/// expanded and at most `max_files` files are listed per directory.
pub fn render_tree(root: &Path, max_depth: usize, max_files: usize) -> io::Result<String> {
    let mut out = String::new();
    render_level(root, "", max_depth, max_files, 0, &mut out)?;
    Ok(out)
}

fn render_level(
    dir: &Path,
    prefix: &str,
    max_depth: usize,
    max_files: usize,
    depth: usize,
    out: &mut String,
) -> io::Result<()> {
    if depth > max_depth {
        return Ok(());
    }

    let (dirs, files) = list_visible(dir)?;

    for (i, name) in dirs.iter().enumerate() {
        let is_last = i == dirs.len() - 1 && files.is_empty();
        let connector = if is_last { LAST_BRANCH } else { BRANCH };
        out.push_str(&format!("{}{}{}/\n", prefix, connector, name));

        let child_prefix = format!("{}{}", prefix, if is_last { SPACE_INDENT } else { PIPE_INDENT });
        render_level(
            &dir.join(name),
            &child_prefix,
            max_depth,
            max_files,
            depth + 1,
            out,
        )?;
    }

    if files.len() > max_files {
        for name in files.iter().take(max_files) {
            out.push_str(&format!("{}{}{}\n", prefix, BRANCH, name));
        }
        out.push_str(&format!(
            "{}{}... and {} more files\n",
            prefix,
            LAST_BRANCH,
            files.len() - max_files
        ));
    } else {
        for (i, name) in files.iter().enumerate() {
            let connector = if i == files.len() - 1 { LAST_BRANCH } else { BRANCH };
            out.push_str(&format!("{}{}{}\n", prefix, connector, name));
        }
    }

    Ok(())
}

/// Sorted visible directory and file names of `dir`. Entries that are
/// neither (dangling links, sockets) are dropped.
fn list_visible(dir: &Path) -> io::Result<(Vec<String>, Vec<String>)> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let name = entry?.file_name().to_string_lossy().to_string();
        if !name.starts_with('.') {
            names.push(name);
        }
    }
    names.sort();

    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for name in names {
        match fs::metadata(dir.join(&name)) {
            Ok(meta) if meta.is_dir() => dirs.push(name),
            Ok(meta) if meta.is_file() => files.push(name),
            _ => {}
        }
    }

    Ok((dirs, files))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_directories_before_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir(root.join("src")).unwrap();
        fs::write(root.join("src").join("main.js"), "").unwrap();
        fs::write(root.join("app.js"), "").unwrap();
        fs::write(root.join(".env"), "").unwrap();

        let tree = render_tree(root, 3, 5).unwrap();
        assert_eq!(tree, "├── src/\n│   └── main.js\n└── app.js\n");
    }

    #[test]
    fn test_last_directory_without_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("a")).unwrap();
        fs::create_dir_all(root.join("b").join("c")).unwrap();

        let tree = render_tree(root, 3, 5).unwrap();
        assert_eq!(tree, "├── a/\n└── b/\n    └── c/\n");
    }

    #[test]
    fn test_file_limit() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        for i in 0..7 {
            fs::write(root.join(format!("f{}.txt", i)), "").unwrap();
        }

        let tree = render_tree(root, 3, 5).unwrap();
        let lines: Vec<&str> = tree.lines().collect();

        assert_eq!(lines.len(), 6);
        assert!(lines[..5].iter().all(|l| l.starts_with("├── ")));
        assert_eq!(lines[4], "├── f4.txt");
        assert_eq!(lines[5], "└── ... and 2 more files");
    }

    #[test]
    fn test_depth_limit() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let deep = root.join("l1").join("l2").join("l3");
        fs::create_dir_all(&deep).unwrap();
        fs::write(deep.join("too_deep.txt"), "").unwrap();

        let tree = render_tree(root, 1, 5).unwrap();
        assert!(tree.contains("l2/"));
        assert!(!tree.contains("l3/"));
        assert!(!tree.contains("too_deep.txt"));
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        assert!(render_tree(&temp_dir.path().join("missing"), 3, 5).is_err());
    }
}
