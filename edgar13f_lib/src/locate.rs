//! Locating the two most recent holdings filings for an institution.

use chrono::NaiveDate;
use edgar13f_api::Client;

use crate::error::AnalyzerError;
use crate::fetch;
use crate::parse;

/// Form types that carry a holdings information table.
const ACCEPTED_FORMS: [&str; 2] = ["13F-HR", "13F-HR/A"];

/// How many older filings to probe for a usable comparison baseline.
const SCAN_AHEAD: usize = 4;

/// Returns the accession numbers of the current filing and a validated
/// previous filing.
///
/// The newest eligible filing is taken unconditionally. For the previous
/// one, amendments sometimes restate a period with a cover document only,
/// so up to [`SCAN_AHEAD`] older filings are probed until one actually
/// carries a holdings table. When none does, the second-most-recent is
/// used regardless; a comparison against an empty baseline then shows
/// every position as new.
pub(crate) async fn locate_filings(
    client: &Client,
    cik: u64,
) -> Result<(String, String), AnalyzerError> {
    let submissions = client.get_submissions(cik).await?;
    let recent = submissions.filings.recent;

    let mut candidates: Vec<(String, NaiveDate)> = recent
        .form
        .iter()
        .zip(recent.accession_number.iter())
        .zip(recent.filing_date.iter())
        .filter(|((form, _), _)| ACCEPTED_FORMS.contains(&form.as_str()))
        .map(|((_, accession), date)| (accession.clone(), *date))
        .collect();
    candidates.sort_by(|a, b| b.1.cmp(&a.1));

    if candidates.len() < 2 {
        return Err(AnalyzerError::InsufficientFilings(cik));
    }

    let current = candidates[0].0.clone();

    let mut previous = None;
    for (accession, _) in candidates.iter().skip(1).take(SCAN_AHEAD) {
        if let Some(content) = fetch::fetch_info_table(client, cik, accession).await {
            if parse::looks_like_info_table(&content) {
                previous = Some(accession.clone());
                break;
            }
        }
        tracing::debug!("previous-filing candidate {} has no holdings table", accession);
    }
    let previous = previous.unwrap_or_else(|| {
        tracing::warn!(
            "no validated previous filing for CIK {}; falling back to second most recent",
            cik
        );
        candidates[1].0.clone()
    });

    Ok((current, previous))
}
