//! Detection tables. Each table is an ordered list of `(pattern, label)` pairs;
//! the order of a table is the order findings are reported in.

use regex::Regex;
use tracing::warn;

/// File extension (lowercase, no dot) to language label.
pub const LANGUAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("js", "JavaScript"),
    ("ts", "TypeScript"),
    ("jsx", "React JSX"),
    ("tsx", "React TSX"),
    ("py", "Python"),
    ("rb", "Ruby"),
    ("php", "PHP"),
    ("java", "Java"),
    ("go", "Go"),
    ("cs", "C#"),
    ("cpp", "C++"),
    ("c", "C"),
    ("swift", "Swift"),
    ("kt", "Kotlin"),
    ("rs", "Rust"),
    ("dart", "Dart"),
    ("html", "HTML"),
    ("css", "CSS"),
    ("scss", "SCSS"),
    ("sass", "Sass"),
    ("less", "Less"),
    ("sql", "SQL"),
    ("md", "Markdown"),
    ("json", "JSON"),
    ("xml", "XML"),
    ("yaml", "YAML"),
    ("yml", "YAML"),
];

/// package.json dependency names (any of) to framework label.
pub const NPM_FRAMEWORKS: &[(&[&str], &str)] = &[
    (&["react"], "React"),
    (&["vue"], "Vue.js"),
    (&["angular", "@angular/core"], "Angular"),
    (&["svelte"], "Svelte"),
    (&["express"], "Express.js"),
    (&["koa"], "Koa.js"),
    (&["next"], "Next.js"),
    (&["nuxt"], "Nuxt.js"),
    (&["bootstrap"], "Bootstrap"),
    (&["tailwindcss"], "Tailwind CSS"),
    (&["@mui/material", "@material-ui/core"], "Material UI"),
];

/// Substrings of a lowercased requirements.txt to framework label.
pub const PYPI_FRAMEWORKS: &[(&str, &str)] = &[
    ("flask", "Flask"),
    ("django", "Django"),
    ("fastapi", "FastAPI"),
    ("bottle", "Bottle"),
    ("pyramid", "Pyramid"),
];

/// Lowercased source markers of a Flask application.
pub const FLASK_IMPORTS: &[&str] = &["from flask import", "import flask"];

pub const NODE_ENTRY_FILES: &[&str] = &["index.js", "app.js", "server.js", "main.js"];

pub const PYTHON_ENTRY_FILES: &[&str] = &[
    "app.py",
    "main.py",
    "run.py",
    "wsgi.py",
    "application.py",
    "server.py",
];

pub const DJANGO_MANAGE_FILE: &str = "manage.py";

pub const IMPORTANT_FILES: &[&str] = &[
    "package.json",
    "requirements.txt",
    "setup.py",
    ".env",
    ".env.example",
    ".gitignore",
    "README.md",
    "docker-compose.yml",
    "Dockerfile",
    "webpack.config.js",
    "babel.config.js",
    "tsconfig.json",
    ".eslintrc.js",
    ".eslintrc.json",
    "jest.config.js",
    "pytest.ini",
    "tox.ini",
    "setup.cfg",
    "pyproject.toml",
];

pub const EXPRESS_ROUTE_PATTERN: &str =
    r#"(app|router)\.(get|post|put|delete|patch)\s*\(\s*['"]([^'"]+)['"]"#;
pub const FLASK_ROUTE_PATTERN: &str = r#"@app.route\s*\(\s*['"]([^'"]+)['"]"#;
pub const DJANGO_ROUTE_PATTERN: &str = r#"path\s*\(\s*['"]([^'"]+)['"]"#;

pub const DATABASE_PATTERNS: &[(&str, &str)] = &[
    (r"mongoose\.connect", "MongoDB (Mongoose)"),
    (r"createConnection.*mysql", "MySQL"),
    (r"new\s+Sequelize", "PostgreSQL/MySQL (Sequelize)"),
    (r"psycopg2", "PostgreSQL (psycopg2)"),
    (r"sqlite3", "SQLite"),
    (r"MongoClient", "MongoDB"),
    (r"db = SQLAlchemy", "SQL (SQLAlchemy)"),
    (r"DATABASES\s*=\s*\{", "Django Database Configuration"),
];

pub const I18N_PATTERNS: &[(&str, &str)] = &[
    (r"i18n", "i18n library"),
    (r"i18next", "i18next library"),
    (r"react-intl", "react-intl library"),
    (r"vue-i18n", "vue-i18n library"),
    (r"gettext", "gettext library"),
    (r#"_\(\s*['"]"#, "gettext translation function"),
    (r"babel.localeselector", "Flask-Babel"),
    (r"django\.utils\.translation", "Django Translation"),
    (r"makemessages", "Django Internationalization"),
    (r"gettext_lazy", "Django Lazy Translation"),
];

/// Directory name fragments that mark translation catalogs.
pub const TRANSLATION_DIR_MARKERS: &[&str] = &["translations", "locales", "i18n"];

pub const SOURCE_EXTENSIONS: &[&str] = &["js", "py"];
pub const I18N_SOURCE_EXTENSIONS: &[&str] = &["js", "py", "json"];
pub const TRANSLATION_FILE_EXTENSIONS: &[&str] = &["json", "po", "mo"];

pub fn language_for_extension(extension: &str) -> Option<&'static str> {
    LANGUAGE_EXTENSIONS
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, language)| *language)
}

/// A compiled `(regex, label)` rule.
pub struct PatternRule {
    pub regex: Regex,
    pub label: &'static str,
}

/// Compiles a table, dropping (and logging) any pattern that fails to compile.
pub fn compile_rules(table: &[(&str, &'static str)]) -> Vec<PatternRule> {
    table
        .iter()
        .filter_map(|(pattern, label)| match Regex::new(pattern) {
            Ok(regex) => Some(PatternRule { regex, label }),
            Err(e) => {
                warn!(pattern, error = %e, "Invalid detection pattern");
                None
            }
        })
        .collect()
}

pub struct RoutePatterns {
    pub express: Regex,
    pub flask: Regex,
    pub django: Regex,
}

impl RoutePatterns {
    /// Compiles the constant route patterns.
    pub fn compile() -> Self {
        Self {
            express: Regex::new(EXPRESS_ROUTE_PATTERN).expect("express route pattern is valid"),
            flask: Regex::new(FLASK_ROUTE_PATTERN).expect("flask route pattern is valid"),
            django: Regex::new(DJANGO_ROUTE_PATTERN).expect("django route pattern is valid"),
        }
    }
}
