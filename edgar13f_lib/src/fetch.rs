//! Multi-tier retrieval of a filing's information table document.
//!
//! A filing's holdings table has no single stable filename or format
//! across years and filers. Three tiers are probed in order: the filing's
//! own directory listing, the legacy bundled TXT document, and a list of
//! conventional names. A candidate counts only when it returns HTTP 200
//! and passes the shape check. Absence is a normal outcome (`None`), and
//! a failed candidate is final; the cascade itself is the retry substitute.

use edgar13f_api::Client;

use crate::parse::looks_like_info_table;

/// Attempts every tier; `None` when all candidates are exhausted.
pub(crate) async fn fetch_info_table(client: &Client, cik: u64, accession: &str) -> Option<String> {
    if let Some(content) = fetch_from_directory_index(client, cik, accession).await {
        return Some(content);
    }
    if let Some(content) = fetch_primary_txt(client, cik, accession).await {
        return Some(content);
    }
    fetch_by_common_names(client, cik, accession).await
}

/// Tier 1: every `.xml` entry of the filing's `index.json`, in listing order.
async fn fetch_from_directory_index(
    client: &Client,
    cik: u64,
    accession: &str,
) -> Option<String> {
    let index = match client.get_directory_index(cik, accession).await {
        Ok(index) => index,
        Err(e) => {
            tracing::debug!("no directory index for {}: {}", accession, e);
            return None;
        }
    };

    for item in &index.directory.item {
        if !item.name.to_lowercase().ends_with(".xml") {
            continue;
        }
        let url = client.directory_file_url(&index.directory.name, &item.name);
        if let Some(content) = fetch_candidate(client, &url).await {
            return Some(content);
        }
    }
    None
}

/// Tier 2: the bundled `{accession}.txt` primary document.
async fn fetch_primary_txt(client: &Client, cik: u64, accession: &str) -> Option<String> {
    let url = client.archive_url(cik, accession, &format!("{}.txt", accession));
    fetch_candidate(client, &url).await
}

/// Tier 3: conventionally-named table documents, including the
/// `d{accession-fragment}inftable.xml` form some filers generate.
async fn fetch_by_common_names(client: &Client, cik: u64, accession: &str) -> Option<String> {
    let acc_clean = edgar13f_api::clean_accession(accession);
    let fragment = &acc_clean[..acc_clean.len().min(12)];
    let candidates = [
        "form13fInfoTable.xml".to_string(),
        "InfoTable.xml".to_string(),
        "xslForm13F_X01/form13fInfoTable.xml".to_string(),
        "xslForm13F_X01/InfoTable.xml".to_string(),
        format!("d{}inftable.xml", fragment),
        "informationTable.xml".to_string(),
        "table.xml".to_string(),
        "holdings.xml".to_string(),
        "primary_doc.xml".to_string(),
    ];

    for name in &candidates {
        let url = client.archive_url(cik, accession, name);
        if let Some(content) = fetch_candidate(client, &url).await {
            return Some(content);
        }
    }
    None
}

/// Fetches one candidate URL, returning its body only on a 200 that looks
/// like an information table.
async fn fetch_candidate(client: &Client, url: &str) -> Option<String> {
    match client.get_text(url).await {
        Ok((200, body)) => {
            if looks_like_info_table(&body) {
                Some(body)
            } else {
                tracing::debug!("candidate {} is not an information table", url);
                None
            }
        }
        Ok((status, _)) => {
            tracing::debug!("candidate {} returned status {}", url, status);
            None
        }
        Err(e) => {
            tracing::debug!("candidate {} failed: {}", url, e);
            None
        }
    }
}
