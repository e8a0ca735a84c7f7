//! Ranked holdings, buys, and sells views over computed delta rows.

use std::cmp::Ordering;

use crate::model::{DeltaRow, RankedTables};

const TOP_HOLDINGS: usize = 20;
const TOP_BUYS: usize = 10;
const TOP_SELLS: usize = 20;

/// Filters, sorts, and truncates the delta rows into the three views.
///
/// Holdings keeps every currently-held position by weight. Buys and sells
/// require both the share count and the weight to have moved in the same
/// direction, so price-only drift does not read as trading activity; both
/// rank by weight change in percentage points.
pub fn generate_tables(rows: &[DeltaRow]) -> RankedTables {
    let mut holdings: Vec<DeltaRow> = rows
        .iter()
        .filter(|r| r.current_value > 0.0)
        .cloned()
        .collect();
    holdings.sort_by(|a, b| cmp_f64(b.weight_current, a.weight_current));
    holdings.truncate(TOP_HOLDINGS);

    let mut buys: Vec<DeltaRow> = rows
        .iter()
        .filter(|r| r.share_change_abs > 0 && r.weight_change > 0.0)
        .cloned()
        .collect();
    buys.sort_by(|a, b| cmp_f64(b.weight_change, a.weight_change));
    buys.truncate(TOP_BUYS);

    let mut sells: Vec<DeltaRow> = rows
        .iter()
        .filter(|r| r.share_change_abs < 0 && r.weight_change < 0.0)
        .cloned()
        .collect();
    sells.sort_by(|a, b| cmp_f64(a.weight_change, b.weight_change));
    sells.truncate(TOP_SELLS);

    RankedTables {
        holdings,
        buys,
        sells,
    }
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
