//! 13F holdings comparison for SEC EDGAR filers.
//!
//! Locates an institution's two most recent 13F filings, extracts their
//! information tables across the several document formats EDGAR serves,
//! and derives ranked holdings, buys, and sells views from the change in
//! portfolio weights between the two periods.

pub mod analyzer;
pub mod changes;
pub mod error;
pub mod export;
mod fetch;
mod locate;
pub mod model;
pub mod parse;
pub mod tables;
pub mod ticker;

pub use edgar13f_api;

pub use analyzer::Analyzer;
pub use error::AnalyzerError;
pub use model::{
    AnalysisReport, DeltaRow, Holding, Holdings, ParsedHoldings, PositionStatus, RankedTables,
};
