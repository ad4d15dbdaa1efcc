//! Path normalization for ownership comparisons.

use std::path::Path;

/// Normalize a path for ownership comparison.
///
/// - strips the project root when the path lies under it
/// - converts backslashes to forward slashes
/// - strips leading separators and `./` / `../` markers
///
/// Dotfiles keep their leading dot (`.env` stays `.env`).
pub fn normalize_path(path: &str, root: Option<&Path>) -> String {
    let path = path.trim();

    let relative = root
        .and_then(|root| Path::new(path).strip_prefix(root).ok())
        .map(|rel| rel.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());

    let mut normalized = relative.replace('\\', "/");
    loop {
        let stripped = normalized
            .strip_prefix("./")
            .or_else(|| normalized.strip_prefix("../"))
            .or_else(|| normalized.strip_prefix('/'));
        match stripped {
            Some(rest) => normalized = rest.to_string(),
            None => break,
        }
    }

    if normalized == "." || normalized == ".." {
        normalized.clear();
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_relative_markers() {
        assert_eq!(normalize_path("./src/a.ts", None), "src/a.ts");
        assert_eq!(normalize_path("../../src/a.ts", None), "src/a.ts");
        assert_eq!(normalize_path("/src/a.ts", None), "src/a.ts");
        assert_eq!(normalize_path("src/a.ts", None), "src/a.ts");
        assert_eq!(normalize_path("  src/a.ts ", None), "src/a.ts");
    }

    #[test]
    fn test_keeps_dotfiles() {
        assert_eq!(normalize_path(".env", None), ".env");
        assert_eq!(normalize_path("./.github/workflows/ci.yml", None), ".github/workflows/ci.yml");
    }

    #[test]
    fn test_strips_project_root() {
        let root = Path::new("/work/project");
        assert_eq!(
            normalize_path("/work/project/src/a.ts", Some(root)),
            "src/a.ts"
        );
        // Not under the root: only leading separators go.
        assert_eq!(
            normalize_path("/work/project-two/src/a.ts", Some(root)),
            "work/project-two/src/a.ts"
        );
    }

    #[test]
    fn test_backslashes() {
        assert_eq!(normalize_path(".\\src\\a.ts", None), "src/a.ts");
    }

    #[test]
    fn test_bare_markers_become_empty() {
        assert_eq!(normalize_path(".", None), "");
        assert_eq!(normalize_path("./", None), "");
        assert_eq!(normalize_path("", None), "");
    }
}
