//! Structured-markup parser for XML information tables.

use std::sync::OnceLock;

use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;

use super::{ParsedHoldings, SnapshotBuilder, TableFormat};

/// Parser for the modern `<informationTable>` XML documents.
///
/// Streams events and collects one row per `<infoTable>` element. Rows
/// missing the issuer name, CUSIP, or value are skipped and counted; a
/// document that fails to parse at all yields an empty snapshot.
pub(super) struct XmlInfoTable;

impl TableFormat for XmlInfoTable {
    fn name(&self) -> &'static str {
        "xml-info-table"
    }

    fn try_parse(&self, content: &str, key_len: usize) -> Option<ParsedHoldings> {
        let trimmed = content.trim_start();
        if !trimmed.starts_with('<') {
            return None;
        }
        let lower = trimmed.to_lowercase();
        if !lower.contains("informationtable") && !lower.contains("infotable") {
            return None;
        }
        Some(parse_document(trimmed, key_len))
    }
}

/// Which leaf element's text is being captured.
#[derive(Clone, Copy)]
enum Field {
    Name,
    Cusip,
    Value,
    Shares,
}

#[derive(Default)]
struct RowFields {
    name: Option<String>,
    cusip: Option<String>,
    value_thousands: Option<f64>,
    shares: Option<i64>,
}

fn parse_document(content: &str, key_len: usize) -> ParsedHoldings {
    let cleaned = strip_default_namespace(content);
    let mut reader = Reader::from_str(&cleaned);
    reader.config_mut().trim_text(true);

    let mut builder = SnapshotBuilder::new(key_len);
    let mut row: Option<RowFields> = None;
    let mut field: Option<Field> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                field = match e.name().as_ref() {
                    b"infoTable" => {
                        row = Some(RowFields::default());
                        None
                    }
                    b"nameOfIssuer" => Some(Field::Name),
                    b"cusip" => Some(Field::Cusip),
                    b"value" => Some(Field::Value),
                    b"sshPrnamt" => Some(Field::Shares),
                    _ => None,
                };
            }
            Ok(Event::Text(t)) => {
                let (Some(row), Some(field)) = (row.as_mut(), field) else {
                    continue;
                };
                let Ok(text) = t.unescape() else {
                    continue;
                };
                let text = text.trim();
                // First occurrence of each field wins within a row.
                match field {
                    Field::Name if row.name.is_none() => row.name = Some(text.to_uppercase()),
                    Field::Cusip if row.cusip.is_none() => row.cusip = Some(text.to_string()),
                    Field::Value if row.value_thousands.is_none() => {
                        row.value_thousands = text.parse().ok();
                    }
                    Field::Shares if row.shares.is_none() => {
                        row.shares = text.parse::<f64>().ok().map(|s| s as i64);
                    }
                    _ => {}
                }
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"infoTable" {
                    if let Some(fields) = row.take() {
                        finish_row(&mut builder, fields);
                    }
                }
                field = None;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                // Malformed markup degrades to an empty snapshot; the run
                // continues with zero-floored totals downstream.
                tracing::warn!("information table XML failed to parse: {}", e);
                return ParsedHoldings::default();
            }
            Ok(_) => {}
        }
    }

    builder.finish()
}

/// Drops the first default `xmlns` declaration so element names match
/// without namespace qualification.
fn strip_default_namespace(content: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r#" xmlns="[^"]+""#).expect("static xmlns pattern compiles")
    });
    re.replace(content, "").into_owned()
}

fn finish_row(builder: &mut SnapshotBuilder, fields: RowFields) {
    match (fields.name, fields.cusip, fields.value_thousands) {
        (Some(name), Some(cusip), Some(value_thousands)) if !cusip.is_empty() => {
            builder.add_row(&cusip, &name, value_thousands * 1000.0, fields.shares.unwrap_or(0));
        }
        _ => builder.skip_row(),
    }
}
