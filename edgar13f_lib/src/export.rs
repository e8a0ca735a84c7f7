//! CSV export of the ranked tables.

use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::AnalyzerError;
use crate::model::{DeltaRow, RankedTables};

/// Writes one CSV per ranked table into `dir`, named
/// `cik_{cik}_{table}_{timestamp}.csv`. Columns follow [`DeltaRow`] field
/// order. Returns the written paths.
pub fn export_tables(
    dir: &Path,
    cik: &str,
    tables: &RankedTables,
) -> Result<Vec<PathBuf>, AnalyzerError> {
    let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let sections = [
        ("holdings", &tables.holdings),
        ("buys", &tables.buys),
        ("sells", &tables.sells),
    ];

    let mut written = Vec::with_capacity(sections.len());
    for (label, rows) in sections {
        let path = dir.join(format!("cik_{}_{}_{}.csv", cik, label, stamp));
        write_table(&path, rows)?;
        tracing::info!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

fn write_table(path: &Path, rows: &[DeltaRow]) -> Result<(), AnalyzerError> {
    let mut wtr = csv::Writer::from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
