//! HTTP client construction for release downloads

use reqwest::blocking::Client;
use std::time::Duration;

/// Timeout for archive downloads (5 minutes, releases can be large)
pub const ARCHIVE_TIMEOUT: Duration = Duration::from_secs(300);

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("aspensqlplus/", env!("CARGO_PKG_VERSION"));

/// Builds HTTP client with the given request timeout
///
/// # Errors
///
/// Returns error if the TLS backend cannot be initialised
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}
