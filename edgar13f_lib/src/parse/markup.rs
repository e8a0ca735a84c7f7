//! Windowed fallback parser for markup without an XML information table.

use std::sync::OnceLock;

use regex::Regex;

use super::{char_window, ParsedHoldings, SnapshotBuilder, TableFormat};

/// Parser for HTML-ish payloads lacking `<infoTable>` structure.
///
/// Works a window around every 9-character identifier token: the issuer
/// name comes from a `nameOfIssuer` tag-adjacent pattern, numbers from
/// between element delimiters, classified by the same magnitude heuristic
/// as the text parser.
pub(super) struct MarkupWindow;

impl TableFormat for MarkupWindow {
    fn name(&self) -> &'static str {
        "markup-window"
    }

    fn try_parse(&self, content: &str, key_len: usize) -> Option<ParsedHoldings> {
        if !content.trim_start().starts_with('<') {
            return None;
        }
        Some(parse_windows(content, key_len))
    }
}

fn parse_windows(content: &str, key_len: usize) -> ParsedHoldings {
    static IDENTIFIER: OnceLock<Regex> = OnceLock::new();
    static TAGGED_NAME: OnceLock<Regex> = OnceLock::new();
    static CELL_NUMBER: OnceLock<Regex> = OnceLock::new();
    static ENTITY: OnceLock<Regex> = OnceLock::new();

    let identifier = IDENTIFIER
        .get_or_init(|| Regex::new(r"([A-Z0-9]{9})").expect("static pattern compiles"));
    let tagged_name = TAGGED_NAME.get_or_init(|| {
        Regex::new(r"(?i)NAMEOFISSUER[^>]*>([^<]+)").expect("static pattern compiles")
    });
    let cell_number = CELL_NUMBER.get_or_init(|| {
        Regex::new(r">(\d{1,3}(?:,\d{3})*)<").expect("static pattern compiles")
    });
    let entity = ENTITY.get_or_init(|| Regex::new(r"&[^;]+;").expect("static pattern compiles"));

    let mut builder = SnapshotBuilder::new(key_len);
    for m in identifier.find_iter(content) {
        let cusip = m.as_str();
        let window = char_window(content, m.start(), m.end(), 800);

        let name = tagged_name
            .captures(window)
            .and_then(|c| c.get(1))
            .map(|m| entity.replace_all(m.as_str(), "").trim().to_uppercase())
            .unwrap_or_default();

        let mut numbers: Vec<i64> = cell_number
            .captures_iter(window)
            .filter_map(|caps| caps.get(1))
            .filter_map(|m| m.as_str().replace(',', "").parse().ok())
            .collect();
        if numbers.is_empty() {
            continue;
        }
        numbers.sort_unstable_by(|a, b| b.cmp(a));
        let shares = numbers[0];
        let value_thousands = if numbers.len() > 1 {
            numbers[numbers.len() - 1]
        } else {
            (shares / 1000).max(0)
        };

        builder.add_row(cusip, &name, value_thousands as f64 * 1000.0, shares);
    }
    builder.finish()
}
