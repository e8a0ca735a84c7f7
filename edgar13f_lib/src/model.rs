//! Core data model: holdings snapshots and derived comparison rows.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

/// One aggregated security position within a single 13F snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Holding {
    /// Issuer name as reported, uppercased. The first non-empty value
    /// observed for an identity key wins; may stay empty when unparsed.
    pub company_name: String,
    /// Market value in dollars (filings state thousands; parsers normalize).
    pub market_value: f64,
    /// Share or principal amount. Zero when the filing does not state one.
    pub shares: i64,
}

/// One filing's positions keyed by identity key: the CUSIP truncated to
/// the configured length (eight by default, merging share classes).
pub type Holdings = HashMap<String, Holding>;

/// Parser output: the aggregated holdings plus a count of table rows the
/// parser gave up on. Skipping is the documented policy for rows with
/// missing or unparseable fields; the count is diagnostic, never fatal.
#[derive(Debug, Default)]
pub struct ParsedHoldings {
    pub holdings: Holdings,
    pub skipped_rows: usize,
}

/// How a position moved between the two compared periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionStatus {
    /// No value in the previous period.
    New,
    /// Value in the previous period, none in the current.
    Exit,
    /// Held in both periods.
    Change,
}

impl fmt::Display for PositionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                PositionStatus::New => "NEW",
                PositionStatus::Exit => "EXIT",
                PositionStatus::Change => "CHANGE",
            }
        )
    }
}

/// Per-security comparison of the two snapshots. Serialized field order is
/// the CSV column order.
#[derive(Debug, Clone, Serialize)]
pub struct DeltaRow {
    pub cusip: String,
    pub company_name: String,
    pub ticker: String,
    pub current_value: f64,
    pub previous_value: f64,
    pub current_shares: i64,
    pub previous_shares: i64,
    /// Position's share of total portfolio value, in percent.
    pub weight_current: f64,
    pub weight_previous: f64,
    /// Weight delta in percentage points.
    pub weight_change: f64,
    pub share_change_abs: i64,
    /// Share count change relative to the previous period; `None` when no
    /// shares were held previously.
    pub share_change_pct: Option<f64>,
    pub status: PositionStatus,
}

/// The three ranked views derived from the delta rows.
#[derive(Debug, Serialize)]
pub struct RankedTables {
    /// Current positions by weight, descending. At most 20.
    pub holdings: Vec<DeltaRow>,
    /// Positions with both share count and weight up, by weight gain. At most 10.
    pub buys: Vec<DeltaRow>,
    /// Positions with both share count and weight down, by weight loss. At most 20.
    pub sells: Vec<DeltaRow>,
}

/// Result of one full analysis run.
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub cik: String,
    pub current_accession: String,
    pub previous_accession: String,
    pub top_holdings: Vec<DeltaRow>,
    pub top_buys: Vec<DeltaRow>,
    pub top_sells: Vec<DeltaRow>,
    /// Every computed row, unordered.
    pub rows: Vec<DeltaRow>,
    /// False when the previous period produced no holdings, either because
    /// no document passed the shape check or because parsing found no rows.
    pub has_previous_data: bool,
    /// Echo of the caller's secondary-sort request; the ranked tables
    /// always order by weight change, matching published comparison views.
    pub sort_by_share_change: bool,
}
