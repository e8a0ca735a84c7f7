//! Error types for the EDGAR client.

/// Errors that can occur when talking to EDGAR.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The declared User-Agent lacks a contactable address. SEC fair-access
    /// policy requires every automated client to identify itself with one.
    #[error("user agent must contain a contact email address")]
    InvalidUserAgent,
    /// An HTTP request failed (network error, timeout, or unreadable body).
    #[error("request failed")]
    RequestFailed,
    /// EDGAR returned a non-success status with a body snippet.
    #[error("request failed with status {status}")]
    HttpStatus { status: u16, body: String },
}
