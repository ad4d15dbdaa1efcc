//! Ownership declaration extractors.
//!
//! Plans declare file ownership in three loose shapes. Each extractor scans
//! the whole plan for one shape and returns its declarations in document
//! order; [`super::OwnershipMap::from_plan`] merges them.
//!
//! ```text
//! | src/foo.ts | Task 1: Setup |          table row
//! - `src/bar.ts` -> Task 2: Feature       bullet declaration
//! ## Task 3: UI                           section membership
//! Files to Create:
//! - `src/App.tsx`
//! ```

use regex::Regex;
use std::sync::LazyLock;

/// A label that starts with `Task <N>`.
static TASK_LABEL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Task\s+\d+").expect("Invalid task label regex"));

static BULLET_DECLARATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[-*+]\s*`([^`]+)`\s*(?:-->|->|=>|→|—|–|-|:)\s*(Task\s+\d+.*?)\s*$")
        .expect("Invalid bullet declaration regex")
});

static HEADING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*?)\s*$").expect("Invalid heading regex"));

static FILES_BLOCK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)files\s+to\s+(?:create|modify)").expect("Invalid files block regex")
});

static FILE_BULLET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-*+]\s*`([^`]+)`").expect("Invalid file bullet regex"));

const CODE_FENCES: &[&str] = &["```", "~~~"];

/// One `path -> owner` fact found in a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Path as written in the plan (backticks removed, trimmed).
    pub path: String,
    /// Owning task label, e.g. `Task 1: Setup`.
    pub owner: String,
}

impl Declaration {
    fn new(path: &str, owner: &str) -> Self {
        Self {
            path: path.trim().to_string(),
            owner: owner.trim().to_string(),
        }
    }
}

/// Signature shared by all extractors.
pub type Extractor = fn(&str) -> Vec<Declaration>;

/// Extractors in precedence order: explicit declarations before task file lists.
pub const EXTRACTORS: &[Extractor] = &[table_rows, bullet_declarations, section_memberships];

/// Whether a label starts with `Task <N>`.
pub fn is_task_label(label: &str) -> bool {
    TASK_LABEL_REGEX.is_match(label.trim())
}

/// Table rows: a path cell immediately followed by a `Task <N>` cell.
///
/// Only the first such pair in a row counts. Separator rows and header cells
/// never pair with a task cell, so they fall out naturally.
pub fn table_rows(text: &str) -> Vec<Declaration> {
    let mut found = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if !line.starts_with('|') {
            continue;
        }

        let cells: Vec<&str> = line
            .trim_matches('|')
            .split('|')
            .map(str::trim)
            .collect();

        let pair = cells.windows(2).find_map(|pair| {
            let path = pair[0].trim_matches('`').trim();
            (is_path_cell(path) && is_task_label(pair[1])).then_some((path, pair[1]))
        });

        if let Some((path, owner)) = pair {
            found.push(Declaration::new(path, owner));
        }
    }

    found
}

/// Bullets of the form ``- `path` -> Task N``, with `->`, `-->`, `=>`, `→`,
/// `—`, `–`, `-` or `:` as the separator.
pub fn bullet_declarations(text: &str) -> Vec<Declaration> {
    text.lines()
        .filter_map(|line| BULLET_DECLARATION_REGEX.captures(line))
        .map(|caps| Declaration::new(&caps[1], &caps[2]))
        .filter(|decl| !decl.path.is_empty())
        .collect()
}

/// Paths listed in `Files to Create` / `Files to Modify` blocks under a
/// `## Task N` heading.
///
/// A task section runs until the next heading at the same or a higher level,
/// or a `---` rule. A files block inside it runs until the next heading or
/// rule; only back-ticked bullet lines contribute. Headings need a space
/// after the `#`s, and lines inside fenced code blocks are skipped.
pub fn section_memberships(text: &str) -> Vec<Declaration> {
    let mut found = Vec::new();
    let mut task: Option<(usize, String)> = None;
    let mut in_files_block = false;
    let mut fence: Option<&str> = None;

    for line in text.lines() {
        let trimmed = line.trim();

        // Fenced code is opaque: its `#` comments are not headings.
        if let Some(marker) = fence {
            if trimmed.starts_with(marker) {
                fence = None;
            }
            continue;
        }
        if let Some(marker) = CODE_FENCES.iter().find(|m| trimmed.starts_with(**m)) {
            fence = Some(*marker);
            continue;
        }

        if trimmed.starts_with("---") {
            task = None;
            in_files_block = false;
            continue;
        }

        if let Some(caps) = HEADING_REGEX.captures(trimmed) {
            let level = caps[1].len();
            let title = caps.get(2).map_or("", |m| m.as_str());

            if level >= 2 && is_task_label(title) {
                task = Some((level, title.to_string()));
                in_files_block = false;
                continue;
            }

            if task.as_ref().is_some_and(|(task_level, _)| level <= *task_level) {
                task = None;
            }
            in_files_block = task.is_some() && FILES_BLOCK_REGEX.is_match(title);
            continue;
        }

        let Some((_, label)) = &task else {
            continue;
        };

        if FILES_BLOCK_REGEX.is_match(trimmed) {
            in_files_block = true;
            continue;
        }

        if in_files_block && let Some(caps) = FILE_BULLET_REGEX.captures(line) {
            let decl = Declaration::new(&caps[1], label);
            if !decl.path.is_empty() {
                found.push(decl);
            }
        }
    }

    found
}

/// A table cell that can name a file: non-empty, not a separator, not a header.
fn is_path_cell(cell: &str) -> bool {
    if cell.is_empty() || cell.chars().all(|c| matches!(c, '-' | ':' | ' ')) {
        return false;
    }

    let lower = cell.to_lowercase();
    if matches!(lower.as_str(), "file" | "files" | "path" | "file path") {
        return false;
    }

    !is_task_label(cell)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(decls: &[Declaration]) -> Vec<(&str, &str)> {
        decls
            .iter()
            .map(|d| (d.path.as_str(), d.owner.as_str()))
            .collect()
    }

    #[test]
    fn test_table_rows() {
        let plan = "\
### File Ownership
| File | Owner Task |
|------|-----------|
| src/foo.ts | Task 1: Setup |
| `src/bar.ts` | Task 2: Feature |
| README.md | docs team |
";
        assert_eq!(
            pairs(&table_rows(plan)),
            vec![("src/foo.ts", "Task 1: Setup"), ("src/bar.ts", "Task 2: Feature")]
        );
    }

    #[test]
    fn test_table_rows_with_leading_columns() {
        let plan = "| 1 | src/a.rs | Task 4: Parser | new |\n";
        // The first adjacent (path, task) pair wins.
        assert_eq!(pairs(&table_rows(plan)), vec![("src/a.rs", "Task 4: Parser")]);
    }

    #[test]
    fn test_table_rows_ignore_task_to_task_cells() {
        let plan = "| Task 1 | Task 2 |\n";
        assert!(table_rows(plan).is_empty());
    }

    #[test]
    fn test_bullet_declarations_separators() {
        let plan = "\
- `src/a.ts` -> Task 1: Alpha
- `src/b.ts` --> Task 2
* `src/c.ts` — Task 3: Gamma
- `src/d.ts`: Task 4
+ `src/e.ts` => Task 5
- `src/f.ts` - Task 6
- `src/g.ts` → Task 7
- `src/h.ts` (no owner)
";
        assert_eq!(
            pairs(&bullet_declarations(plan)),
            vec![
                ("src/a.ts", "Task 1: Alpha"),
                ("src/b.ts", "Task 2"),
                ("src/c.ts", "Task 3: Gamma"),
                ("src/d.ts", "Task 4"),
                ("src/e.ts", "Task 5"),
                ("src/f.ts", "Task 6"),
                ("src/g.ts", "Task 7"),
            ]
        );
    }

    #[test]
    fn test_section_memberships() {
        let plan = "\
# Plan

## Task 1: Foundation

Set up the core.

Files to Create:
- `src/core.ts`
- `src/utils.ts`

## Task 2: UI

**Files to Modify:**
- `src/components/App.tsx`
";
        assert_eq!(
            pairs(&section_memberships(plan)),
            vec![
                ("src/core.ts", "Task 1: Foundation"),
                ("src/utils.ts", "Task 1: Foundation"),
                ("src/components/App.tsx", "Task 2: UI"),
            ]
        );
    }

    #[test]
    fn test_section_files_heading_and_multiple_blocks() {
        let plan = "\
## Task 3: API
### Files to Create
- `src/api.rs`
### Notes
- `not/a/file.rs`
### Files to Modify
- `src/main.rs`
";
        assert_eq!(
            pairs(&section_memberships(plan)),
            vec![("src/api.rs", "Task 3: API"), ("src/main.rs", "Task 3: API")]
        );
    }

    #[test]
    fn test_section_ends_at_rule_and_higher_heading() {
        let plan = "\
## Task 1: A
Files to Create:
- `src/a.ts`
---
Files to Create:
- `src/orphan.ts`
## Appendix
Files to Modify:
- `src/other.ts`
";
        assert_eq!(pairs(&section_memberships(plan)), vec![("src/a.ts", "Task 1: A")]);
    }

    #[test]
    fn test_section_without_files_block_claims_nothing() {
        let plan = "\
## Task 1: Research
- `docs/notes.md`

## Task 2: Build
Files to Create:
- `src/build.rs`
";
        assert_eq!(
            pairs(&section_memberships(plan)),
            vec![("src/build.rs", "Task 2: Build")]
        );
    }

    #[test]
    fn test_code_block_comment_does_not_end_section() {
        let plan = "\
## Task 1: Setup

```bash
# install dependencies
npm install
---
```

~~~
# another comment
- `src/ignored.ts`
~~~

Files to Create:
- `src/a.ts`
";
        assert_eq!(pairs(&section_memberships(plan)), vec![("src/a.ts", "Task 1: Setup")]);
    }

    #[test]
    fn test_hash_tag_line_is_not_a_heading() {
        let plan = "## Task 2: Feature\n#frontend work\nFiles to Modify:\n- `src/b.ts`\n";
        assert_eq!(pairs(&section_memberships(plan)), vec![("src/b.ts", "Task 2: Feature")]);
    }

    #[test]
    fn test_bullet_declaration_without_space_after_marker() {
        let plan = "-`src/a.ts` -> Task 1: Alpha\n*`src/b.ts`: Task 2\n";
        assert_eq!(
            pairs(&bullet_declarations(plan)),
            vec![("src/a.ts", "Task 1: Alpha"), ("src/b.ts", "Task 2")]
        );
    }

    #[test]
    fn test_top_level_task_heading_is_not_a_section() {
        let plan = "# Task 1: Everything\nFiles to Create:\n- `src/x.rs`\n";
        assert!(section_memberships(plan).is_empty());
    }

    #[test]
    fn test_is_task_label() {
        assert!(is_task_label("Task 1"));
        assert!(is_task_label("Task 12: Setup"));
        assert!(!is_task_label("Owner Task"));
        assert!(!is_task_label("Task one"));
    }
}
