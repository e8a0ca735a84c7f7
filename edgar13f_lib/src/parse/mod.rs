//! Format detection and parsing of 13F information tables.
//!
//! EDGAR serves holdings tables in no single stable shape: modern filings
//! carry an XML information table, older ones embed the table in the
//! bundled SGML/TXT document, and some expose only a rendered HTML page.
//! Parsing is an ordered cascade of strategies, most structured first;
//! the first strategy that recognizes the payload produces the snapshot.

mod markup;
mod text;
mod xml;

use crate::model::{Holding, Holdings, ParsedHoldings};

/// Substrings identifying a holdings information table, matched
/// case-insensitively by the shape predicate.
const TABLE_MARKERS: [&str; 4] = ["informationtable", "infotable", "nameofissuer", "cusip"];

/// Whether a payload looks like a holdings information table.
///
/// Requires at least two distinct markers so a stray issuer-name or CUSIP
/// mention alone does not qualify. A primary document wrapping only the
/// cover and summary sections ("edgarSubmission" with no table element)
/// is rejected outright.
pub fn looks_like_info_table(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    let s = text.to_lowercase();
    if s.contains("edgarsubmission")
        && !s.contains("infotable")
        && !s.contains("informationtable")
    {
        return false;
    }
    let hits = TABLE_MARKERS
        .iter()
        .filter(|marker| s.contains(*marker))
        .count();
    hits >= 2
}

/// A parsing strategy for one observed information-table shape.
trait TableFormat {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Attempts to parse `content`, or `None` when the payload is not this
    /// strategy's shape. A recognized but unusable payload still returns
    /// `Some` with empty holdings; later strategies must not re-interpret it.
    fn try_parse(&self, content: &str, key_len: usize) -> Option<ParsedHoldings>;
}

/// Parses a holdings document of any supported shape into a snapshot.
///
/// `key_len` is the identity-key length applied to each CUSIP (eight to
/// aggregate share classes, nine to keep them distinct).
pub fn parse_info_table(content: &str, key_len: usize) -> ParsedHoldings {
    let formats: [&dyn TableFormat; 3] = [
        &xml::XmlInfoTable,
        &markup::MarkupWindow,
        &text::LineTable,
    ];
    for format in formats {
        if let Some(parsed) = format.try_parse(content, key_len) {
            tracing::debug!(
                "parsed {} holdings via {} ({} rows skipped)",
                parsed.holdings.len(),
                format.name(),
                parsed.skipped_rows
            );
            return parsed;
        }
    }
    ParsedHoldings::default()
}

/// Accumulates raw table rows into aggregated holdings.
///
/// Scoped to one parse call; the snapshot it finishes into is never
/// mutated afterwards. Rows sharing an identity key sum their value and
/// shares, so share-class and lot lines of one issue merge.
struct SnapshotBuilder {
    key_len: usize,
    holdings: Holdings,
    skipped_rows: usize,
}

impl SnapshotBuilder {
    fn new(key_len: usize) -> Self {
        Self {
            key_len,
            holdings: Holdings::new(),
            skipped_rows: 0,
        }
    }

    fn add_row(&mut self, cusip: &str, company_name: &str, market_value: f64, shares: i64) {
        let entry = self
            .holdings
            .entry(identity_key(cusip, self.key_len))
            .or_insert_with(Holding::default);
        entry.market_value += market_value;
        entry.shares += shares;
        if entry.company_name.is_empty() && !company_name.is_empty() {
            entry.company_name = company_name.to_string();
        }
    }

    fn skip_row(&mut self) {
        self.skipped_rows += 1;
    }

    fn distinct_identities(&self) -> usize {
        self.holdings.len()
    }

    fn finish(self) -> ParsedHoldings {
        ParsedHoldings {
            holdings: self.holdings,
            skipped_rows: self.skipped_rows,
        }
    }
}

fn identity_key(cusip: &str, key_len: usize) -> String {
    match cusip.char_indices().nth(key_len) {
        Some((idx, _)) => cusip[..idx].to_string(),
        None => cusip.to_string(),
    }
}

/// A slice of `text` extending `radius` bytes to each side of
/// `start..end`, snapped outward to char boundaries.
fn char_window(text: &str, start: usize, end: usize, radius: usize) -> &str {
    let mut lo = start.saturating_sub(radius);
    while lo > 0 && !text.is_char_boundary(lo) {
        lo -= 1;
    }
    let mut hi = (end + radius).min(text.len());
    while hi < text.len() && !text.is_char_boundary(hi) {
        hi += 1;
    }
    &text[lo..hi]
}
