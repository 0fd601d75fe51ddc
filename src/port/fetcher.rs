//! Fetcher port for retrieving search and listing pages.

use async_trait::async_trait;

use crate::error::FetchError;

/// Retrieves raw page markup over HTTP.
///
/// Implementations supply browser-identity headers themselves; callers
/// only name the URL. Tests substitute a canned-document fetcher.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the document at `url` and return its body.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}
