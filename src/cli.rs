use std::path::PathBuf;

use clap::Parser;

/// Shape of the fields printed for each matched line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// One value per field; later captures of a label win.
    Flat,
    /// Every capture of each label, in group order.
    Multi,
    /// Values converted by their `:int`/`:float` annotations, bracket paths nested.
    Typed,
}

#[derive(Parser, Debug)]
#[command(name = "grokrs", version, about = "Extract structured fields from text with grok patterns")]
pub struct Args {
    /// Grok pattern to match against each line, e.g. '%{COMMONAPACHELOG}'
    #[arg(required_unless_present = "list_patterns")]
    pub pattern: Option<String>,

    /// Files to read; stdin when none are given
    pub files: Vec<PathBuf>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Pattern file, directory or glob to load (repeatable)
    #[arg(short, long = "patterns", value_name = "SOURCE")]
    pub patterns: Vec<PathBuf>,

    /// Define a pattern inline as NAME=EXPR (repeatable)
    #[arg(short, long = "define", value_name = "NAME=EXPR")]
    pub define: Vec<String>,

    /// Only placeholders with an explicit field name become captures
    #[arg(long)]
    pub named_only: bool,

    /// Do not load the built-in pattern table
    #[arg(long)]
    pub no_default_patterns: bool,

    /// Omit fields whose capture is empty
    #[arg(long)]
    pub remove_empty: bool,

    /// Extraction mode
    #[arg(short, long, default_value = "flat", value_parser = ["flat", "multi", "typed"])]
    pub mode: String,

    /// Output format
    #[arg(short, long, default_value = "json", value_parser = ["json", "text"])]
    pub format: String,

    /// List all known pattern names, one per line, then exit
    #[arg(long)]
    pub list_patterns: bool,

    /// Enable debug logging to stderr
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    pub fn output_mode(&self) -> OutputMode {
        match self.mode.as_str() {
            "multi" => OutputMode::Multi,
            "typed" => OutputMode::Typed,
            _ => OutputMode::Flat,
        }
    }

    /// Split each `--define NAME=EXPR` at the first `=`.
    pub fn definitions(&self) -> anyhow::Result<Vec<(String, String)>> {
        self.define
            .iter()
            .map(|def| match def.split_once('=') {
                Some((name, expr)) if !name.trim().is_empty() => {
                    Ok((name.trim().to_string(), expr.to_string()))
                }
                _ => anyhow::bail!("invalid --define {def:?}: expected NAME=EXPR"),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("grokrs").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn pattern_is_required() {
        assert!(Args::try_parse_from(["grokrs"]).is_err());
        let args = parse(&["--list-patterns"]);
        assert!(args.list_patterns);
        assert_eq!(args.pattern, None);
    }

    #[test]
    fn defaults() {
        let args = parse(&["%{DAY}"]);
        assert_eq!(args.pattern.as_deref(), Some("%{DAY}"));
        assert!(args.files.is_empty());
        assert_eq!(args.output_mode(), OutputMode::Flat);
        assert_eq!(args.format, "json");
        assert!(!args.named_only);
    }

    #[test]
    fn repeatable_sources_and_definitions() {
        let args = parse(&[
            "-p", "base", "--patterns", "extra/*.grok", "-d", "NUM=\\d+", "-d", "KV=%{WORD:k}=%{NUM:v}",
            "%{KV}", "a.log", "b.log",
        ]);
        assert_eq!(args.patterns, vec![PathBuf::from("base"), PathBuf::from("extra/*.grok")]);
        assert_eq!(args.files.len(), 2);
        assert_eq!(
            args.definitions().unwrap(),
            vec![
                ("NUM".to_string(), r"\d+".to_string()),
                ("KV".to_string(), "%{WORD:k}=%{NUM:v}".to_string()),
            ]
        );
    }

    #[test]
    fn invalid_definition_is_an_error() {
        assert!(parse(&["-d", "NOEQUALS", "x"]).definitions().is_err());
        assert!(parse(&["-d", "=x", "x"]).definitions().is_err());
    }

    #[test]
    fn mode_parsing() {
        assert_eq!(parse(&["-m", "multi", "x"]).output_mode(), OutputMode::Multi);
        assert_eq!(parse(&["--mode", "typed", "x"]).output_mode(), OutputMode::Typed);
        assert!(Args::try_parse_from(["grokrs", "-m", "bogus", "x"]).is_err());
    }
}
