pub mod json;
pub mod text;

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;

use crate::compiled::{Fields, MultiFields, TypedFields};

/// Extracted fields of one line, in whichever shape the output mode asked
/// for. Keys are sorted so output is stable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RecordFields {
    Flat(BTreeMap<String, String>),
    Multi(BTreeMap<String, Vec<String>>),
    Typed(TypedFields),
}

impl From<Fields> for RecordFields {
    fn from(fields: Fields) -> Self {
        RecordFields::Flat(fields.into_iter().collect())
    }
}

impl From<MultiFields> for RecordFields {
    fn from(fields: MultiFields) -> Self {
        RecordFields::Multi(fields.into_iter().collect())
    }
}

impl From<TypedFields> for RecordFields {
    fn from(fields: TypedFields) -> Self {
        RecordFields::Typed(fields)
    }
}

/// A matched input line.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Input file, or `None` for stdin.
    pub path: Option<String>,
    /// 1-based line number.
    pub line: usize,
    pub fields: RecordFields,
}

pub trait Formatter {
    fn format_to(&self, records: &[Record], out: &mut dyn Write);

    fn print(&self, records: &[Record]) {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        self.format_to(records, &mut lock);
    }
}

pub fn create_formatter(format: &str) -> Box<dyn Formatter> {
    match format {
        "json" => Box::new(json::JsonFormatter),
        // "text" and any unknown value
        _ => Box::new(text::TextFormatter),
    }
}
