use std::io::Write;

use serde::Serialize;

use crate::formatter::{Formatter, Record, RecordFields};

/// One JSON object per line (JSON Lines).
pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonRecord<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<&'a str>,
    line: usize,
    fields: &'a RecordFields,
}

impl Formatter for JsonFormatter {
    fn format_to(&self, records: &[Record], out: &mut dyn Write) {
        for record in records {
            let output = JsonRecord {
                path: record.path.as_deref(),
                line: record.line,
                fields: &record.fields,
            };
            // String keys and finite-or-null numbers always serialize
            if let Ok(json) = serde_json::to_string(&output) {
                let _ = writeln!(out, "{json}");
            }
        }
    }
}
