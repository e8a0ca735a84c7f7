//! HTTP client for the SEC EDGAR submission and archive endpoints.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    types::{DirectoryIndex, Submissions},
    Error,
};

/// Minimum pause between consecutive EDGAR requests. SEC asks automated
/// clients to stay well under 10 requests per second; this is a static
/// courtesy delay, not adaptive backoff.
const REQUEST_DELAY: Duration = Duration::from_millis(200);

/// HTTP client for SEC EDGAR.
///
/// Covers the three endpoints the 13F analyzer needs: the per-CIK
/// submissions index on `data.sec.gov`, the per-filing `index.json`
/// directory listing, and raw archive documents on `www.sec.gov`.
/// Every request carries the operator-supplied User-Agent and a 30-second
/// timeout; consecutive requests are spaced by a fixed delay.
pub struct Client {
    data_base_url: String,
    archives_base_url: String,
    http: reqwest::Client,
    /// Tracks when the last request was sent, for request spacing.
    last_request: Mutex<Option<Instant>>,
}

impl Client {
    /// Creates a client pointing at the production EDGAR hosts.
    ///
    /// Fails with [`Error::InvalidUserAgent`] when `user_agent` carries no
    /// `@` contact token.
    pub fn new(user_agent: &str) -> Result<Self, Error> {
        Self::with_base_urls(
            user_agent,
            "https://data.sec.gov",
            "https://www.sec.gov",
        )
    }

    /// Creates a client with custom base hosts. Used for testing with wiremock.
    pub fn with_base_urls(
        user_agent: &str,
        data_base_url: &str,
        archives_base_url: &str,
    ) -> Result<Self, Error> {
        if !user_agent.contains('@') {
            return Err(Error::InvalidUserAgent);
        }
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })?;
        Ok(Self {
            data_base_url: data_base_url.trim_end_matches('/').to_string(),
            archives_base_url: archives_base_url.trim_end_matches('/').to_string(),
            http,
            last_request: Mutex::new(None),
        })
    }

    /// Fetches the submissions index for a CIK, zero-padded to ten digits.
    pub async fn get_submissions(&self, cik: u64) -> Result<Submissions, Error> {
        let url = format!("{}/submissions/CIK{:010}.json", self.data_base_url, cik);
        self.get_json::<Submissions>(&url).await
    }

    /// Fetches the `index.json` directory listing of one filing.
    pub async fn get_directory_index(
        &self,
        cik: u64,
        accession: &str,
    ) -> Result<DirectoryIndex, Error> {
        let url = format!(
            "{}/Archives/edgar/data/{}/{}/index.json",
            self.archives_base_url,
            cik,
            clean_accession(accession)
        );
        self.get_json::<DirectoryIndex>(&url).await
    }

    /// Fetches a raw document, returning the status code and body text.
    ///
    /// Non-success statuses are returned, not mapped to errors; callers
    /// probing candidate filenames treat anything but 200 as a miss.
    pub async fn get_text(&self, url: &str) -> Result<(u16, String), Error> {
        let url = parse_url(url)?;
        self.pace().await;
        let resp = self.http.get(url).send().await.map_err(|e| {
            tracing::error!("Failed to get resource: {}", e);
            Error::RequestFailed
        })?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed
        })?;
        Ok((status, body))
    }

    /// URL of a named file inside a filing's archive directory.
    pub fn archive_url(&self, cik: u64, accession: &str, file: &str) -> String {
        format!(
            "{}/Archives/edgar/data/{}/{}/{}",
            self.archives_base_url,
            cik,
            clean_accession(accession),
            file
        )
    }

    /// URL of a file under a directory path as reported by `index.json`.
    pub fn directory_file_url(&self, directory_name: &str, file: &str) -> String {
        format!(
            "{}{}/{}",
            self.archives_base_url,
            directory_name.trim_end_matches('/'),
            file
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, Error> {
        let url = parse_url(url)?;
        self.pace().await;
        let resp = self
            .http
            .get(url)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get resource: {}", e);
                Error::RequestFailed
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        serde_json::from_str::<T>(&body).map_err(|e| {
            tracing::error!("Failed to parse resource: {} | body: {}", e, truncate_body(&body));
            Error::RequestFailed
        })
    }

    /// Sleeps until [`REQUEST_DELAY`] has elapsed since the previous request.
    async fn pace(&self) {
        let sleep_dur = {
            let last = self.last_request.lock().unwrap_or_else(|e| e.into_inner());
            last.map(|t| t.elapsed())
                .filter(|elapsed| *elapsed < REQUEST_DELAY)
                .map(|elapsed| REQUEST_DELAY - elapsed)
        };
        if let Some(dur) = sleep_dur {
            tokio::time::sleep(dur).await;
        }
        *self.last_request.lock().unwrap_or_else(|e| e.into_inner()) = Some(Instant::now());
    }
}

/// Strips the dashes from an accession number, as archive paths require.
pub fn clean_accession(accession: &str) -> String {
    accession.replace('-', "")
}

fn parse_url(url: &str) -> Result<Url, Error> {
    Url::parse(url).map_err(|e| {
        tracing::error!("Invalid URL constructed: {}", e);
        Error::RequestFailed
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        format!("{}...[truncated]", &body[..MAX])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_user_agent_without_contact() {
        let result = Client::new("research bot");
        assert!(matches!(result, Err(Error::InvalidUserAgent)));
    }

    #[test]
    fn accepts_user_agent_with_contact() {
        assert!(Client::new("Research analysis@example.com").is_ok());
    }

    #[test]
    fn clean_accession_strips_dashes() {
        assert_eq!(
            clean_accession("0000950123-24-011775"),
            "000095012324011775"
        );
    }

    #[test]
    fn archive_url_uses_cleaned_accession() {
        let client = Client::new("Research analysis@example.com").unwrap();
        assert_eq!(
            client.archive_url(1067983, "0000950123-24-011775", "index.json"),
            "https://www.sec.gov/Archives/edgar/data/1067983/000095012324011775/index.json"
        );
    }
}
