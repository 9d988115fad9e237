use std::io::Write;

use crate::formatter::{Formatter, Record, RecordFields};
use crate::value::Value;

/// `path:line` header, then one sorted `key: value` line per field, with a
/// blank line between records.
pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_to(&self, records: &[Record], out: &mut dyn Write) {
        for (i, record) in records.iter().enumerate() {
            if i > 0 {
                let _ = writeln!(out);
            }
            let _ = match &record.path {
                Some(path) => writeln!(out, "{path}:{}", record.line),
                None => writeln!(out, "{}", record.line),
            };
            match &record.fields {
                RecordFields::Flat(fields) => {
                    for (key, value) in fields {
                        let _ = writeln!(out, "{key}: {value}");
                    }
                }
                RecordFields::Multi(fields) => {
                    for (key, values) in fields {
                        let _ = writeln!(out, "{key}: {}", values.join(", "));
                    }
                }
                RecordFields::Typed(fields) => {
                    for (key, value) in fields {
                        write_typed(out, key, value);
                    }
                }
            }
        }
    }
}

/// Nested maps are flattened to dotted keys.
fn write_typed(out: &mut dyn Write, key: &str, value: &Value) {
    let _ = match value {
        Value::String(s) => writeln!(out, "{key}: {s}"),
        Value::Int(n) => writeln!(out, "{key}: {n}"),
        Value::Float(n) => writeln!(out, "{key}: {n}"),
        Value::Map(map) => {
            for (child, value) in map {
                write_typed(out, &format!("{key}.{child}"), value);
            }
            Ok(())
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::tests::sample_records;

    fn render(records: &[Record]) -> String {
        let mut buf = Vec::new();
        TextFormatter.format_to(records, &mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn empty_produces_no_output() {
        assert_eq!(render(&[]), "");
    }

    #[test]
    fn records_are_separated_by_blank_lines() {
        assert_eq!(
            render(&sample_records()),
            "access.log:1\nbytes: 207\nverb: GET\n\n7\nserver.port: 8080\n"
        );
    }

    #[test]
    fn multi_values_are_joined() {
        let record = Record {
            path: None,
            line: 3,
            fields: RecordFields::Multi(
                [("day".to_string(), vec!["Tue".to_string(), "Wed".to_string()])]
                    .into_iter()
                    .collect(),
            ),
        };
        assert_eq!(render(&[record]), "3\nday: Tue, Wed\n");
    }
}
