//! Serde models for the EDGAR endpoints the analyzer consumes.

use chrono::NaiveDate;
use serde::Deserialize;

/// Response of `/submissions/CIK{cik}.json`.
#[derive(Debug, Deserialize)]
pub struct Submissions {
    pub filings: Filings,
}

#[derive(Debug, Deserialize)]
pub struct Filings {
    pub recent: RecentFilings,
}

/// The most recent filings as parallel arrays: entry `i` of each vector
/// describes the same filing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentFilings {
    pub form: Vec<String>,
    pub accession_number: Vec<String>,
    pub filing_date: Vec<NaiveDate>,
}

/// Response of the per-filing `index.json` directory listing.
#[derive(Debug, Deserialize)]
pub struct DirectoryIndex {
    pub directory: Directory,
}

#[derive(Debug, Deserialize)]
pub struct Directory {
    /// Archive path of the filing directory, e.g.
    /// `/Archives/edgar/data/1067983/000095012324011775`.
    pub name: String,
    #[serde(default)]
    pub item: Vec<DirectoryItem>,
}

#[derive(Debug, Deserialize)]
pub struct DirectoryItem {
    pub name: String,
}
