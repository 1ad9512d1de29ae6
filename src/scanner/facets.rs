//! One function per detection facet. Each facet walks the tree on its own and
//! skips any file it cannot read.

use crate::scanner::rules::{
    compile_rules, language_for_extension, RoutePatterns, DATABASE_PATTERNS,
    DJANGO_MANAGE_FILE, FLASK_IMPORTS, I18N_PATTERNS, I18N_SOURCE_EXTENSIONS, IMPORTANT_FILES,
    NODE_ENTRY_FILES, NPM_FRAMEWORKS, PYPI_FRAMEWORKS, PYTHON_ENTRY_FILES, SOURCE_EXTENSIONS,
    TRANSLATION_DIR_MARKERS, TRANSLATION_FILE_EXTENSIONS,
};
use crate::scanner::walker::{display_name, FileRead, ProjectWalker};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

pub fn count_extensions(walker: &ProjectWalker) -> BTreeMap<String, usize> {
    let mut extensions = BTreeMap::new();

    for path in walker.files() {
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            if ext.is_empty() {
                continue;
            }
            *extensions.entry(ext.to_lowercase()).or_insert(0) += 1;
        }
    }

    extensions
}

pub fn detect_frameworks(walker: &ProjectWalker) -> BTreeSet<String> {
    let mut frameworks = BTreeSet::new();

    if let Some(manifest) = read_package_json(walker) {
        for (packages, label) in NPM_FRAMEWORKS {
            if packages.iter().any(|p| has_npm_dependency(&manifest, p)) {
                frameworks.insert(label.to_string());
            }
        }
    }

    if let Some(FileRead::Text(requirements)) = walker.read_top_level("requirements.txt") {
        let requirements = requirements.to_lowercase();
        for (needle, label) in PYPI_FRAMEWORKS {
            if requirements.contains(needle) {
                frameworks.insert(label.to_string());
            }
        }
    }

    if walker.top_level_exists(DJANGO_MANAGE_FILE) {
        frameworks.insert("Django".to_string());
    }

    if !frameworks.contains("Flask") {
        let imports_flask = walker.files_with_extensions(&["py"]).iter().any(|path| {
            walker.read_text(path).into_text().is_some_and(|content| {
                let content = content.to_lowercase();
                FLASK_IMPORTS.iter().any(|marker| content.contains(marker))
            })
        });
        if imports_flask {
            frameworks.insert("Flask".to_string());
        }
    }

    frameworks
}

pub fn identify_languages(extensions: &BTreeMap<String, usize>) -> BTreeSet<String> {
    extensions
        .iter()
        .filter_map(|(ext, count)| {
            language_for_extension(ext).map(|language| format!("{} ({} files)", language, count))
        })
        .collect()
}

pub fn find_entry_points(walker: &ProjectWalker) -> Vec<String> {
    let mut entry_points: Vec<String> = NODE_ENTRY_FILES
        .iter()
        .filter(|name| walker.top_level_exists(name))
        .map(|name| name.to_string())
        .collect();

    if let Some(script) = read_package_json(walker).and_then(|m| start_script(&m)) {
        entry_points.push(format!("npm start ({})", script));
    }

    entry_points.extend(
        PYTHON_ENTRY_FILES
            .iter()
            .filter(|name| walker.top_level_exists(name))
            .map(|name| name.to_string()),
    );

    if walker.top_level_exists(DJANGO_MANAGE_FILE) {
        entry_points.push(format!("{} (Django)", DJANGO_MANAGE_FILE));
    }

    entry_points
}

pub fn find_important_files(walker: &ProjectWalker) -> Vec<String> {
    IMPORTANT_FILES
        .iter()
        .filter(|name| walker.top_level_exists(name))
        .map(|name| name.to_string())
        .collect()
}

pub fn find_api_routes(walker: &ProjectWalker) -> Vec<String> {
    let patterns = RoutePatterns::compile();
    let mut routes = Vec::new();

    for path in walker.files_with_extensions(SOURCE_EXTENSIONS) {
        let Some(content) = walker.read_text(&path).into_text() else {
            continue;
        };
        let file = display_name(&path);

        for caps in patterns.express.captures_iter(&content) {
            routes.push(format!("{} ({}) - {}", &caps[3], caps[2].to_uppercase(), file));
        }

        for caps in patterns.flask.captures_iter(&content) {
            routes.push(format!("{} - {}", &caps[1], file));
        }

        for caps in patterns.django.captures_iter(&content) {
            routes.push(format!("{} - {}", &caps[1], file));
        }
    }

    routes
}

pub fn find_database_config(walker: &ProjectWalker) -> Vec<String> {
    let rules = compile_rules(DATABASE_PATTERNS);
    let mut databases = Vec::new();

    for path in walker.files_with_extensions(SOURCE_EXTENSIONS) {
        let Some(content) = walker.read_text(&path).into_text() else {
            continue;
        };
        let file = display_name(&path);

        for rule in rules.iter().filter(|r| r.regex.is_match(&content)) {
            databases.push(format!("{} - {}", rule.label, file));
        }
    }

    databases
}

pub fn analyze_multilingual_features(walker: &ProjectWalker) -> Vec<String> {
    let rules = compile_rules(I18N_PATTERNS);
    let mut features = Vec::new();

    for path in walker.files() {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        let is_source = I18N_SOURCE_EXTENSIONS.contains(&ext);
        let is_catalog = TRANSLATION_FILE_EXTENSIONS.contains(&ext);

        if !is_source && !is_catalog {
            continue;
        }

        if is_source {
            let Some(content) = walker.read_text(&path).into_text() else {
                continue;
            };
            let file = display_name(&path);

            for rule in rules.iter().filter(|r| r.regex.is_match(&content)) {
                features.push(format!("{} - {}", rule.label, file));
            }
        }

        if is_catalog && in_translation_dir(walker.root(), &path) {
            features.push(format!("Translation file - {}", path.display()));
        }
    }

    features
}

fn in_translation_dir(root: &Path, path: &Path) -> bool {
    let parent = path.parent().unwrap_or(root);
    let relative = parent.strip_prefix(root).unwrap_or(parent);
    let relative = relative.to_string_lossy().to_lowercase();

    TRANSLATION_DIR_MARKERS
        .iter()
        .any(|marker| relative.contains(marker))
}

fn read_package_json(walker: &ProjectWalker) -> Option<serde_json::Value> {
    match walker.read_top_level("package.json")? {
        FileRead::Text(content) => serde_json::from_str(&content).ok(),
        FileRead::Skipped(_) => None,
    }
}

fn has_npm_dependency(manifest: &serde_json::Value, package: &str) -> bool {
    ["dependencies", "devDependencies"].iter().any(|section| {
        manifest
            .get(section)
            .and_then(|deps| deps.as_object())
            .is_some_and(|deps| deps.contains_key(package))
    })
}

/// `scripts.start` of a parsed package.json, if declared.
pub fn start_script(manifest: &serde_json::Value) -> Option<String> {
    let start = manifest.get("scripts")?.get("start")?;
    Some(match start.as_str() {
        Some(script) => script.to_string(),
        None => start.to_string(),
    })
}

/// Whether a language label list mentions the given language.
pub fn mentions_language(languages: &BTreeSet<String>, language: &str) -> bool {
    let prefix = format!("{} (", language);
    languages.iter().any(|l| l.starts_with(&prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScanConfig;
    use std::fs;
    use tempfile::TempDir;

    fn walker_for(root: &Path) -> ProjectWalker {
        ProjectWalker::new(root, &ScanConfig::default())
    }

    #[test]
    fn test_extension_tally_excludes_hidden_and_normalizes_case() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("app.py"), "").unwrap();
        fs::create_dir(root.join("pkg")).unwrap();
        fs::write(root.join("pkg").join("util.PY"), "").unwrap();
        fs::write(root.join("config.json"), "{}").unwrap();
        fs::write(root.join(".hidden.py"), "").unwrap();
        fs::write(root.join("Makefile"), "").unwrap();

        let tally = count_extensions(&walker_for(root));

        let expected: BTreeMap<String, usize> =
            [("py".to_string(), 2), ("json".to_string(), 1)].into_iter().collect();
        assert_eq!(tally, expected);
    }

    #[test]
    fn test_frameworks_from_package_json() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(
            root.join("package.json"),
            r#"{"dependencies": {"react": "^18.0.0"}, "devDependencies": {"tailwindcss": "3"}}"#,
        )
        .unwrap();

        let frameworks = detect_frameworks(&walker_for(root));
        assert!(frameworks.contains("React"));
        assert!(frameworks.contains("Tailwind CSS"));
        assert!(!frameworks.contains("Vue.js"));
    }

    #[test]
    fn test_frameworks_from_requirements() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("requirements.txt"), "Flask==2.3.0\nrequests\n").unwrap();

        let frameworks = detect_frameworks(&walker_for(root));
        assert!(frameworks.contains("Flask"));
        assert_eq!(frameworks.len(), 1);
    }

    #[test]
    fn test_frameworks_from_sources_and_markers() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("manage.py"), "").unwrap();
        fs::create_dir(root.join("web")).unwrap();
        fs::write(root.join("web").join("views.py"), "from flask import Flask\n").unwrap();

        let frameworks = detect_frameworks(&walker_for(root));
        assert!(frameworks.contains("Django"));
        assert!(frameworks.contains("Flask"));
    }

    #[test]
    fn test_malformed_package_json_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("package.json"), "{ not json").unwrap();
        fs::write(root.join("requirements.txt"), "fastapi\n").unwrap();

        let walker = walker_for(root);
        let frameworks = detect_frameworks(&walker);
        assert_eq!(frameworks.into_iter().collect::<Vec<_>>(), vec!["FastAPI"]);
        assert!(find_entry_points(&walker).is_empty());
    }

    #[test]
    fn test_identify_languages() {
        let tally: BTreeMap<String, usize> = [
            ("py".to_string(), 2),
            ("json".to_string(), 1),
            ("lock".to_string(), 4),
        ]
        .into_iter()
        .collect();

        let languages: Vec<String> = identify_languages(&tally).into_iter().collect();
        assert_eq!(languages, vec!["JSON (1 files)", "Python (2 files)"]);
        assert!(mentions_language(&identify_languages(&tally), "Python"));
    }

    #[test]
    fn test_entry_points_order() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("server.js"), "").unwrap();
        fs::write(root.join("index.js"), "").unwrap();
        fs::write(
            root.join("package.json"),
            r#"{"scripts": {"start": "node server.js"}}"#,
        )
        .unwrap();
        fs::write(root.join("app.py"), "").unwrap();
        fs::write(root.join("manage.py"), "").unwrap();

        let entry_points = find_entry_points(&walker_for(root));
        assert_eq!(
            entry_points,
            vec![
                "index.js",
                "server.js",
                "npm start (node server.js)",
                "app.py",
                "manage.py (Django)",
            ]
        );
    }

    #[test]
    fn test_important_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("pyproject.toml"), "").unwrap();
        fs::write(root.join(".gitignore"), "").unwrap();
        fs::write(root.join("package.json"), "{}").unwrap();

        let files = find_important_files(&walker_for(root));
        assert_eq!(files, vec!["package.json", ".gitignore", "pyproject.toml"]);
    }

    #[test]
    fn test_flask_route_recorded_with_filename() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(
            root.join("routes.py"),
            "@app.route('/foo')\ndef foo():\n    return 'ok'\n",
        )
        .unwrap();

        let routes = find_api_routes(&walker_for(root));
        assert_eq!(routes, vec!["/foo - routes.py"]);
    }

    #[test]
    fn test_express_and_django_routes() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(
            root.join("server.js"),
            "app.get('/health', h);\nrouter.delete(\"/items/:id\", d);\n",
        )
        .unwrap();
        fs::write(root.join("urls.py"), "urlpatterns = [path('admin/', site)]\n").unwrap();

        let routes = find_api_routes(&walker_for(root));
        assert_eq!(
            routes,
            vec![
                "/health (GET) - server.js",
                "/items/:id (DELETE) - server.js",
                "admin/ - urls.py",
            ]
        );
    }

    #[test]
    fn test_database_config() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(
            root.join("db.js"),
            "const { MongoClient } = require('mongodb');\nmongoose.connect(url);\n",
        )
        .unwrap();
        fs::write(root.join("models.py"), "import sqlite3\n").unwrap();

        let databases = find_database_config(&walker_for(root));
        assert_eq!(
            databases,
            vec![
                "MongoDB (Mongoose) - db.js",
                "MongoDB - db.js",
                "SQLite - models.py",
            ]
        );
    }

    #[test]
    fn test_multilingual_features() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("app.js"), "import i18next from 'i18next';\n").unwrap();
        fs::create_dir_all(root.join("static").join("locales")).unwrap();
        fs::write(root.join("static").join("locales").join("fr.json"), "{}").unwrap();
        fs::write(root.join("static").join("locales").join("de.po"), "").unwrap();

        let features = analyze_multilingual_features(&walker_for(root));

        assert!(features.contains(&"i18n library - app.js".to_string()));
        assert!(features.contains(&"i18next library - app.js".to_string()));
        assert_eq!(
            features
                .iter()
                .filter(|f| f.starts_with("Translation file - "))
                .count(),
            2
        );
    }

    #[test]
    fn test_translation_dir_is_relative_to_root() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("i18n_project");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("data.json"), "{}").unwrap();

        let features = analyze_multilingual_features(&walker_for(&root));
        assert!(features.is_empty());
    }
}
