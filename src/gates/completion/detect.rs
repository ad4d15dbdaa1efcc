//! Test and lint command detection from project marker files.

use regex::Regex;
use serde_json::Value;
use std::path::Path;
use std::sync::LazyLock;

/// `npm init` writes this placeholder when a project has no tests.
const NPM_PLACEHOLDER_TEST: &str = "echo \"Error: no test specified\" && exit 1";

const ESLINT_CONFIGS: &[&str] = &[
    ".eslintrc",
    ".eslintrc.js",
    ".eslintrc.cjs",
    ".eslintrc.json",
    ".eslintrc.yml",
    "eslint.config.js",
    "eslint.config.cjs",
    "eslint.config.mjs",
];

const PYTEST_MARKERS: &[&str] = &["pytest.ini", "setup.cfg", "pyproject.toml"];

static MAKE_TEST_TARGET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^test\s*:").expect("Invalid make test target regex"));

static MAKE_LINT_TARGET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^lint\s*:").expect("Invalid make lint target regex"));

/// Detect the project's test command.
pub fn detect_test_command(root: &Path) -> Option<String> {
    if let Some(test) = package_script(root, "test")
        && test != NPM_PLACEHOLDER_TEST
    {
        return Some("npm test".to_string());
    }

    if makefile_has_target(root, &MAKE_TEST_TARGET) {
        return Some("make test".to_string());
    }

    if root.join("Cargo.toml").exists() {
        return Some("cargo test".to_string());
    }

    if root.join("go.mod").exists() {
        return Some("go test ./...".to_string());
    }

    if PYTEST_MARKERS.iter().any(|marker| root.join(marker).exists()) {
        return Some("python -m pytest --tb=short -q".to_string());
    }

    if root.join("mix.exs").exists() {
        return Some("mix test".to_string());
    }

    None
}

/// Detect the project's lint command.
pub fn detect_lint_command(root: &Path) -> Option<String> {
    if package_script(root, "lint").is_some() {
        return Some("npm run lint".to_string());
    }

    if ESLINT_CONFIGS.iter().any(|config| root.join(config).exists()) {
        return Some("npx eslint .".to_string());
    }

    if makefile_has_target(root, &MAKE_LINT_TARGET) {
        return Some("make lint".to_string());
    }

    if root.join("Cargo.toml").exists() {
        return Some("cargo clippy -- -D warnings".to_string());
    }

    if root.join(".golangci.yml").exists() || root.join(".golangci.yaml").exists() {
        return Some("golangci-lint run".to_string());
    }

    if root.join("ruff.toml").exists() || root.join(".ruff.toml").exists() {
        return Some("ruff check .".to_string());
    }

    if root.join(".flake8").exists() {
        return Some("flake8 .".to_string());
    }

    None
}

/// Apply a configured override to a detected command.
///
/// An override replaces detection; an empty override disables the step.
pub fn resolve_command(
    configured: Option<&str>,
    detect: impl FnOnce() -> Option<String>,
) -> Option<String> {
    match configured {
        Some(command) if command.trim().is_empty() => None,
        Some(command) => Some(command.trim().to_string()),
        None => detect(),
    }
}

/// Non-empty `scripts.<name>` from `package.json`.
fn package_script(root: &Path, name: &str) -> Option<String> {
    let content = std::fs::read_to_string(root.join("package.json")).ok()?;
    let package: Value = serde_json::from_str(&content).ok()?;
    package
        .get("scripts")?
        .get(name)?
        .as_str()
        .filter(|script| !script.is_empty())
        .map(str::to_string)
}

fn makefile_has_target(root: &Path, target: &Regex) -> bool {
    std::fs::read_to_string(root.join("Makefile"))
        .map(|makefile| target.is_match(&makefile))
        .unwrap_or(false)
}
