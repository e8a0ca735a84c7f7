//! Semi-structured text parser for SGML/TXT bundled documents.

use std::sync::OnceLock;

use regex::Regex;

use super::{char_window, ParsedHoldings, SnapshotBuilder, TableFormat};

/// Line markers that open the information-table region.
const TABLE_START_MARKERS: [&str; 4] = [
    "information table",
    "<informationtable",
    "<infotable",
    "info table",
];

/// Line markers that close it; the signature block always follows the table.
const TABLE_END_MARKERS: [&str; 4] = [
    "</informationtable",
    "</infotable",
    "<signature",
    "<signatures",
];

/// Below this many distinct identities the line scan is considered to have
/// missed the table, and the label-window extraction runs instead.
const MIN_IDENTITIES: usize = 5;

/// Parser for legacy bundled TXT/SGML documents.
///
/// Scans lines inside the table region for 9-character security
/// identifiers, reading the text before the identifier as the issuer name
/// and classifying the line's numbers by magnitude: the largest is the
/// share count, the smallest the value in thousands. That heuristic
/// misreads lines whose share counts are themselves thousands-scaled;
/// accepted as a bounded accuracy risk, with the label-window fallback
/// catching documents where the line scan finds too little.
pub(super) struct LineTable;

impl TableFormat for LineTable {
    fn name(&self) -> &'static str {
        "line-table"
    }

    fn try_parse(&self, content: &str, key_len: usize) -> Option<ParsedHoldings> {
        if content.trim_start().starts_with('<') {
            return None;
        }
        Some(parse_lines(content, key_len))
    }
}

fn cusip_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b([A-Z0-9]{9})\b").expect("static cusip pattern compiles"))
}

fn number_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(\d{1,3}(?:,\d{3})*|\d+)\b").expect("static number pattern compiles")
    })
}

fn parse_lines(content: &str, key_len: usize) -> ParsedHoldings {
    let mut builder = SnapshotBuilder::new(key_len);
    let mut in_table = false;

    for line in content.lines() {
        let lower = line.to_lowercase();
        if !in_table && TABLE_START_MARKERS.iter().any(|m| lower.contains(m)) {
            in_table = true;
            continue;
        }
        if in_table && TABLE_END_MARKERS.iter().any(|m| lower.contains(m)) {
            in_table = false;
        }
        if !in_table {
            continue;
        }

        let Some(m) = cusip_token_re().find(line) else {
            continue;
        };
        let cusip = m.as_str();

        let parts: Vec<&str> = line.split_whitespace().collect();
        let mut name = String::new();
        for (i, part) in parts.iter().enumerate() {
            if part.contains(cusip) {
                name = parts[..i].join(" ").trim().to_uppercase().replace(['<', '>'], "");
                break;
            }
        }

        let mut numbers = extract_numbers(line);
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

    if builder.distinct_identities() < MIN_IDENTITIES {
        return parse_label_windows(content, key_len);
    }
    builder.finish()
}

fn extract_numbers(line: &str) -> Vec<i64> {
    number_token_re()
        .captures_iter(line)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| m.as_str().replace(',', "").parse().ok())
        .collect()
}

/// Fallback extraction keyed on explicit `CUSIP:` labels.
///
/// Takes a window around each labeled identifier and reads the name,
/// value, and share fields independently by their own labels, keeping
/// only windows that yield a value or a share count.
fn parse_label_windows(content: &str, key_len: usize) -> ParsedHoldings {
    static CUSIP_LABEL: OnceLock<Regex> = OnceLock::new();
    static NAME_LABEL: OnceLock<Regex> = OnceLock::new();
    static VALUE_LABEL: OnceLock<Regex> = OnceLock::new();
    static SHARES_LABEL: OnceLock<Regex> = OnceLock::new();

    let cusip_label = CUSIP_LABEL.get_or_init(|| {
        Regex::new(r"(?:CUSIP|cusip)\s*[: ]\s*([A-Z0-9]{9})").expect("static pattern compiles")
    });
    let name_label = NAME_LABEL.get_or_init(|| {
        Regex::new(r"(?i)(?:NAMEOFISSUER|NAME OF ISSUER)\s*[: ]\s*([^\n<]+)")
            .expect("static pattern compiles")
    });
    let value_label = VALUE_LABEL.get_or_init(|| {
        Regex::new(r"(?:VALUE|value)\s*[: ]\s*(\d{1,3}(?:,\d{3})*|\d+)")
            .expect("static pattern compiles")
    });
    let shares_label = SHARES_LABEL.get_or_init(|| {
        Regex::new(r"(?:SSHPRNAMT|sshprnamt|SHARES)\s*[: ]\s*(\d{1,3}(?:,\d{3})*|\d+)")
            .expect("static pattern compiles")
    });

    let mut builder = SnapshotBuilder::new(key_len);
    for caps in cusip_label.captures_iter(content) {
        let Some(m) = caps.get(1) else { continue };
        let cusip = m.as_str();
        let window = char_window(content, m.start(), m.end(), 500);

        let name = name_label
            .captures(window)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().replace(['<', '>', '/'], "").trim().to_uppercase())
            .unwrap_or_default();
        let market_value = label_number(value_label, window) as f64 * 1000.0;
        let shares = label_number(shares_label, window);

        if market_value > 0.0 || shares > 0 {
            builder.add_row(cusip, &name, market_value, shares);
        }
    }
    builder.finish()
}

fn label_number(re: &Regex, window: &str) -> i64 {
    re.captures(window)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().replace(',', "").parse().ok())
        .unwrap_or(0)
}
