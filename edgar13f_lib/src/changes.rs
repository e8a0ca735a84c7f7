//! Comparison of two holdings snapshots into per-security delta rows.

use std::collections::HashSet;

use crate::model::{DeltaRow, Holding, Holdings, PositionStatus};
use crate::ticker::TickerTable;

/// Computes one [`DeltaRow`] per identity key present in either snapshot.
///
/// Weights are each position's share of its snapshot total in percent, so
/// they sum to 100 across a snapshot's nonzero positions. The returned
/// order is unspecified; ranking happens in [`crate::tables`].
pub fn calculate_changes(
    current: &Holdings,
    previous: &Holdings,
    tickers: &TickerTable,
) -> Vec<DeltaRow> {
    let total_current = snapshot_total(current);
    let total_previous = snapshot_total(previous);
    let absent = Holding::default();

    let keys: HashSet<&String> = current.keys().chain(previous.keys()).collect();
    let mut rows = Vec::with_capacity(keys.len());
    for key in keys {
        let cur = current.get(key).unwrap_or(&absent);
        let prev = previous.get(key).unwrap_or(&absent);

        let company_name = if cur.company_name.is_empty() {
            prev.company_name.clone()
        } else {
            cur.company_name.clone()
        };
        let ticker = tickers.lookup(&company_name);

        let weight_current = cur.market_value / total_current * 100.0;
        let weight_previous = prev.market_value / total_previous * 100.0;
        let share_change_abs = cur.shares - prev.shares;
        let share_change_pct = if prev.shares > 0 {
            Some(share_change_abs as f64 / prev.shares as f64 * 100.0)
        } else {
            None
        };
        let status = if prev.market_value == 0.0 {
            PositionStatus::New
        } else if cur.market_value == 0.0 {
            PositionStatus::Exit
        } else {
            PositionStatus::Change
        };

        rows.push(DeltaRow {
            cusip: key.clone(),
            company_name,
            ticker,
            current_value: cur.market_value,
            previous_value: prev.market_value,
            current_shares: cur.shares,
            previous_shares: prev.shares,
            weight_current,
            weight_previous,
            weight_change: weight_current - weight_previous,
            share_change_abs,
            share_change_pct,
            status,
        });
    }
    rows
}

/// Sum of market values, floored at one dollar so weights stay defined
/// for a snapshot with no parsed value.
fn snapshot_total(holdings: &Holdings) -> f64 {
    let total: f64 = holdings.values().map(|h| h.market_value).sum();
    if total > 0.0 {
        total
    } else {
        1.0
    }
}
