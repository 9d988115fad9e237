pub mod alias;
pub mod cache;
pub mod cli;
pub mod compiled;
pub mod config;
pub mod error;
pub mod expand;
pub mod formatter;
pub mod fs;
pub mod grok;
pub mod groups;
pub mod pattern_db;
pub mod registry;
pub mod resolver;
pub mod syntax;
pub mod value;

use std::io::BufRead;
use std::path::Path;
use std::sync::Once;

use anyhow::{Context, Result};
use rayon::prelude::*;

use cli::{Args, OutputMode};
use config::load_config;
use formatter::{create_formatter, Record, RecordFields};

pub use compiled::{CompiledPattern, Fields, MultiFields, TypedFields};
pub use config::Config;
pub use error::{Error, NumberError};
pub use grok::Grok;
pub use value::{FieldType, Value};

static TRACING_INIT: Once = Once::new();

/// Install a stderr `tracing` subscriber. `RUST_LOG` wins when set;
/// otherwise `--debug` enables this crate's debug events.
fn init_tracing(debug: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) if debug => EnvFilter::new("grokrs=debug"),
            Err(_) => return,
        };
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(filter)
            .init();
    });
}

/// Run the CLI. Returns the exit code: 0 = some line matched, 1 = no line
/// matched, 3 = error (reported by the caller).
pub fn run(args: Args) -> Result<i32> {
    init_tracing(args.debug);

    let mut config = load_config(args.config.as_deref())?;
    config.named_captures_only |= args.named_only;
    config.skip_default_patterns |= args.no_default_patterns;
    config.remove_empty_values |= args.remove_empty;
    config.pattern_sources.extend(args.patterns.iter().cloned());
    config.patterns.extend(args.definitions()?);

    let grok = Grok::with_config(&config)?;
    tracing::debug!(
        patterns = grok.pattern_names().len(),
        sources = config.pattern_sources.len(),
        "engine ready"
    );

    // --list-patterns: print all known pattern names and exit
    if args.list_patterns {
        for name in grok.pattern_names() {
            println!("{name}");
        }
        return Ok(0);
    }

    let pattern = args
        .pattern
        .as_deref()
        .context("a pattern is required")?;
    let compiled = grok.compile(pattern)?;
    let mode = args.output_mode();

    let records = if args.files.is_empty() {
        extract_reader(&compiled, mode, std::io::stdin().lock())?
    } else {
        let mut records = Vec::new();
        for path in &args.files {
            records.extend(extract_file(&compiled, mode, path)?);
        }
        records
    };

    let formatter = create_formatter(&args.format);
    formatter.print(&records);

    Ok(if records.is_empty() { 1 } else { 0 })
}

/// Fields of `line` in the requested shape, or `None` if it does not match.
fn extract_line(
    compiled: &CompiledPattern,
    mode: OutputMode,
    line: &str,
) -> error::Result<Option<RecordFields>> {
    if !compiled.is_match(line)? {
        return Ok(None);
    }
    let fields = match mode {
        OutputMode::Flat => compiled.parse(line)?.into(),
        OutputMode::Multi => compiled.parse_to_multi_map(line)?.into(),
        OutputMode::Typed => compiled.parse_typed(line)?.into(),
    };
    Ok(Some(fields))
}

/// Lines of a file are extracted in parallel; records keep line order.
fn extract_file(compiled: &CompiledPattern, mode: OutputMode, path: &Path) -> Result<Vec<Record>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let lines: Vec<&str> = text.lines().collect();
    let display = path.display().to_string();

    let records: Vec<Option<Record>> = lines
        .par_iter()
        .enumerate()
        .map(|(idx, line)| -> Result<Option<Record>> {
            let fields = extract_line(compiled, mode, line)
                .with_context(|| format!("{display}:{}", idx + 1))?;
            Ok(fields.map(|fields| Record {
                path: Some(display.clone()),
                line: idx + 1,
                fields,
            }))
        })
        .collect::<Result<_>>()?;

    Ok(records.into_iter().flatten().collect())
}

fn extract_reader(
    compiled: &CompiledPattern,
    mode: OutputMode,
    reader: impl BufRead,
) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", idx + 1))?;
        let fields = extract_line(compiled, mode, &line)
            .with_context(|| format!("line {}", idx + 1))?;
        if let Some(fields) = fields {
            records.push(Record {
                path: None,
                line: idx + 1,
                fields,
            });
        }
    }
    Ok(records)
}
