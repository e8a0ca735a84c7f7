//! Error taxonomy for analysis runs.

use thiserror::Error;

/// Errors fatal to an analysis run.
///
/// Only these abort a run. Everything else degrades: a missing
/// previous-period table becomes an empty snapshot, a malformed table
/// document parses to zero rows, and unparseable rows are skipped and
/// counted in [`crate::model::ParsedHoldings::skipped_rows`].
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// Invalid construction input, e.g. a User-Agent without a contact
    /// address or a non-numeric CIK.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// Fewer than two eligible 13F filings exist for the institution.
    #[error("fewer than two 13F filings available for CIK {0}")]
    InsufficientFilings(u64),
    /// No candidate document for the current period passed the shape check.
    #[error("no information table found for accession {0}")]
    MissingInfoTable(String),
    /// The submissions index could not be retrieved.
    #[error(transparent)]
    Api(#[from] edgar13f_api::Error),
    /// CSV export failed.
    #[error("export failed: {0}")]
    Export(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
