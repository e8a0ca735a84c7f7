//! End-to-end 13F comparison runs.

use std::path::Path;

use edgar13f_api::Client;

use crate::changes::calculate_changes;
use crate::error::AnalyzerError;
use crate::export::export_tables;
use crate::model::{AnalysisReport, ParsedHoldings};
use crate::parse::parse_info_table;
use crate::tables::generate_tables;
use crate::ticker::TickerTable;
use crate::{fetch, locate};

/// The first eight CUSIP characters name the issuer and issue; the ninth
/// is a check digit. Keying on eight merges share-class lot lines.
const CUSIP_KEY_LEN: usize = 8;

/// Compares an institution's two most recent 13F filings.
///
/// One instance can serve any number of sequential runs; nothing is
/// cached between them. Every run is strictly ordered: locate, fetch
/// current, fetch previous, parse both, compute deltas, rank.
pub struct Analyzer {
    client: Client,
    tickers: TickerTable,
    key_len: usize,
}

impl Analyzer {
    /// Creates an analyzer talking to production EDGAR.
    ///
    /// `user_agent` must identify the operator with a contact email
    /// address; construction fails otherwise.
    pub fn new(user_agent: &str) -> Result<Self, AnalyzerError> {
        let client =
            Client::new(user_agent).map_err(|e| AnalyzerError::Config(e.to_string()))?;
        Self::with_client(client)
    }

    /// Creates an analyzer with custom EDGAR hosts. Used for testing.
    pub fn with_base_urls(
        user_agent: &str,
        data_base_url: &str,
        archives_base_url: &str,
    ) -> Result<Self, AnalyzerError> {
        let client = Client::with_base_urls(user_agent, data_base_url, archives_base_url)
            .map_err(|e| AnalyzerError::Config(e.to_string()))?;
        Self::with_client(client)
    }

    fn with_client(client: Client) -> Result<Self, AnalyzerError> {
        let tickers = TickerTable::load().map_err(|e| AnalyzerError::Config(e.to_string()))?;
        Ok(Self {
            client,
            tickers,
            key_len: CUSIP_KEY_LEN,
        })
    }

    /// Keys holdings by full CUSIP, keeping share classes distinct.
    pub fn with_full_cusip_keys(mut self) -> Self {
        self.key_len = 9;
        self
    }

    /// Finds the current and previous filing accession numbers for a CIK.
    pub async fn locate_filings(&self, cik: u64) -> Result<(String, String), AnalyzerError> {
        locate::locate_filings(&self.client, cik).await
    }

    /// Retrieves the information table document of one filing, or `None`
    /// when no candidate passes the shape check.
    pub async fn fetch_info_table(&self, cik: u64, accession: &str) -> Option<String> {
        fetch::fetch_info_table(&self.client, cik, accession).await
    }

    /// Runs a full comparison for the institution.
    ///
    /// A missing current-period table is fatal; a missing previous-period
    /// table degrades to an empty baseline with `has_previous_data` unset.
    /// With `export_csv`, the three ranked tables are also written to
    /// timestamped CSV files in the working directory.
    pub async fn analyze(
        &self,
        cik: &str,
        export_csv: bool,
        sort_by_share_change: bool,
    ) -> Result<AnalysisReport, AnalyzerError> {
        let cik_num: u64 = cik
            .trim()
            .parse()
            .map_err(|_| AnalyzerError::Config(format!("CIK must be numeric, got {:?}", cik)))?;

        let (current_accession, previous_accession) = self.locate_filings(cik_num).await?;
        tracing::info!(
            "comparing {} against {}",
            current_accession,
            previous_accession
        );

        let current_raw = self
            .fetch_info_table(cik_num, &current_accession)
            .await
            .ok_or_else(|| AnalyzerError::MissingInfoTable(current_accession.clone()))?;
        let previous_raw = self.fetch_info_table(cik_num, &previous_accession).await;
        if previous_raw.is_none() {
            tracing::warn!(
                "no information table for previous filing {}; comparing against empty baseline",
                previous_accession
            );
        }

        let current = parse_info_table(&current_raw, self.key_len);
        let previous = previous_raw
            .map(|raw| parse_info_table(&raw, self.key_len))
            .unwrap_or_default();
        log_parse_outcome(&current_accession, &current);
        log_parse_outcome(&previous_accession, &previous);

        let has_previous_data = !previous.holdings.is_empty();
        let rows = calculate_changes(&current.holdings, &previous.holdings, &self.tickers);
        let tables = generate_tables(&rows);

        if export_csv {
            export_tables(Path::new("."), cik, &tables)?;
        }

        Ok(AnalysisReport {
            cik: cik.to_string(),
            current_accession,
            previous_accession,
            top_holdings: tables.holdings,
            top_buys: tables.buys,
            top_sells: tables.sells,
            rows,
            has_previous_data,
            sort_by_share_change,
        })
    }
}

fn log_parse_outcome(accession: &str, parsed: &ParsedHoldings) {
    if parsed.skipped_rows > 0 {
        tracing::warn!(
            "{}: {} holdings parsed, {} rows skipped",
            accession,
            parsed.holdings.len(),
            parsed.skipped_rows
        );
    } else {
        tracing::debug!("{}: {} holdings parsed", accession, parsed.holdings.len());
    }
}
