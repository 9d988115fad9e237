use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobMatcher};
use ignore::WalkBuilder;

/// Resolve pattern sources to concrete files.
///
/// A file is used directly, a directory is walked recursively (respecting
/// .gitignore, skipping hidden entries) and anything containing glob
/// metacharacters is expanded with globset. A source that names nothing is
/// an error.
pub fn discover_pattern_files(sources: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for source in sources {
        files.extend(discover_source(source)?);
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn discover_source(source: &Path) -> Result<Vec<PathBuf>> {
    if source.is_file() {
        return Ok(vec![source.to_path_buf()]);
    }
    if source.is_dir() {
        return walk_directory(source, None);
    }

    let text = source.to_string_lossy();
    if !is_glob(&text) {
        anyhow::bail!("pattern source does not exist: {}", source.display());
    }
    let matcher = GlobBuilder::new(&text)
        .literal_separator(true)
        .build()
        .with_context(|| format!("invalid pattern source glob: {text}"))?
        .compile_matcher();
    let files = walk_directory(&glob_root(source), Some(&matcher))?;
    if files.is_empty() {
        anyhow::bail!("pattern source matched no files: {text}");
    }
    Ok(files)
}

fn is_glob(text: &str) -> bool {
    text.contains(['*', '?', '[', '{'])
}

/// Longest leading run of components without glob metacharacters.
fn glob_root(glob: &Path) -> PathBuf {
    let root: PathBuf = glob
        .components()
        .take_while(|c| !is_glob(&c.as_os_str().to_string_lossy()))
        .collect();
    if root.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        root
    }
}

fn walk_directory(dir: &Path, matcher: Option<&GlobMatcher>) -> Result<Vec<PathBuf>> {
    let mut builder = WalkBuilder::new(dir);
    builder.hidden(true).git_ignore(true).git_global(true);

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry.context("error walking directory")?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        // Walks rooted at "." yield "./x"; match globs against "x"
        let candidate = path.strip_prefix(".").unwrap_or(path);
        if matcher.is_none_or(|m| m.is_match(candidate)) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

/// Parse a pattern file: one `NAME expression` definition per line.
///
/// Blank lines and lines starting with `#` are skipped. The name ends at the
/// first whitespace; the rest of the line, trimmed, is the expression.
pub fn parse_pattern_lines(text: &str) -> Result<Vec<(String, String)>> {
    let mut patterns = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((name, expr)) = line.split_once(char::is_whitespace) else {
            anyhow::bail!("line {}: pattern {line:?} has no expression", idx + 1);
        };
        let expr = expr.trim();
        if expr.is_empty() {
            anyhow::bail!("line {}: pattern {name:?} has no expression", idx + 1);
        }
        patterns.push((name.to_string(), expr.to_string()));
    }

    Ok(patterns)
}

/// Read every pattern file a source names, in sorted order.
pub fn load_pattern_source(source: &Path) -> Result<Vec<(String, String)>> {
    let mut patterns = Vec::new();

    for file in discover_pattern_files(&[source.to_path_buf()])? {
        let text = std::fs::read_to_string(&file)
            .with_context(|| format!("failed to read pattern file {}", file.display()))?;
        let parsed = parse_pattern_lines(&text)
            .with_context(|| format!("invalid pattern file {}", file.display()))?;
        patterns.extend(parsed);
    }

    Ok(patterns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn parses_definitions_and_skips_comments() {
        let text = "# base patterns\n\nINT [+-]?\\d+\n  WORD \\b\\w+\\b  \nPAIR %{INT:a} %{INT:b}\n";
        let parsed = parse_pattern_lines(text).unwrap();
        assert_eq!(
            parsed,
            vec![
                ("INT".to_string(), r"[+-]?\d+".to_string()),
                ("WORD".to_string(), r"\b\w+\b".to_string()),
                ("PAIR".to_string(), "%{INT:a} %{INT:b}".to_string()),
            ]
        );
    }

    #[test]
    fn tab_separates_name_from_expression() {
        let parsed = parse_pattern_lines("NUM\t\\d+").unwrap();
        assert_eq!(parsed[0], ("NUM".to_string(), r"\d+".to_string()));
    }

    #[test]
    fn name_without_expression_reports_line() {
        let err = parse_pattern_lines("A a\n\nLONELY\n").unwrap_err();
        assert!(err.to_string().contains("line 3"), "{err}");
    }

    #[test]
    fn direct_file_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("base");
        fs::write(&file, "A a\n").unwrap();
        assert_eq!(discover_pattern_files(&[file.clone()]).unwrap(), vec![file]);
    }

    #[test]
    fn directories_are_walked_recursively_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("nested");
        fs::create_dir_all(&sub).unwrap();
        fs::write(dir.path().join("z"), "Z z\n").unwrap();
        fs::write(dir.path().join("a"), "A a\n").unwrap();
        fs::write(sub.join("m"), "M m\n").unwrap();

        let files = discover_pattern_files(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(
            files,
            vec![dir.path().join("a"), sub.join("m"), dir.path().join("z")]
        );
    }

    #[test]
    fn globs_select_matching_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("one.grok"), "ONE 1\n").unwrap();
        fs::write(dir.path().join("two.grok"), "TWO 2\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "not patterns\n").unwrap();

        let glob = dir.path().join("*.grok");
        let files = discover_pattern_files(&[glob]).unwrap();
        assert_eq!(
            files,
            vec![dir.path().join("one.grok"), dir.path().join("two.grok")]
        );
    }

    #[test]
    fn glob_matching_nothing_errors() {
        let dir = tempfile::tempdir().unwrap();
        let glob = dir.path().join("*.grok");
        assert!(discover_pattern_files(&[glob]).is_err());
    }

    #[test]
    fn nonexistent_source_errors() {
        let result = discover_pattern_files(&[PathBuf::from("/no/such/patterns")]);
        assert!(result.is_err());
    }

    #[test]
    fn load_pattern_source_concatenates_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a"), "A a\n").unwrap();
        fs::write(dir.path().join("b"), "# comment\nB %{A}\n").unwrap();
        let patterns = load_pattern_source(dir.path()).unwrap();
        assert_eq!(
            patterns,
            vec![
                ("A".to_string(), "a".to_string()),
                ("B".to_string(), "%{A}".to_string()),
            ]
        );
    }

    #[test]
    fn invalid_file_error_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken"), "BROKEN\n").unwrap();
        let err = load_pattern_source(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("broken"), "{err:#}");
    }
}
