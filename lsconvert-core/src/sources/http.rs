//! HTTP resolver, enabled with the `remote` feature

use super::{dimensions_from_bytes, document, DocumentResolver, ImageResolver, Resolved, ResolvedImage};
use crate::error::{ConvertError, Result};
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches images and documents over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpResolver {
    client: Client,
}

impl HttpResolver {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("lsconvert/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConvertError::Http(e.to_string()))?;
        Ok(Self { client })
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        debug!("Fetching {url}");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| ConvertError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConvertError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .map_err(|e| ConvertError::Http(e.to_string()))?;
        Ok(body.to_vec())
    }
}

impl ImageResolver for HttpResolver {
    fn resolve_image(&self, location: &str) -> Result<Resolved<ResolvedImage>> {
        let body = self.fetch(location)?;
        Ok(match dimensions_from_bytes(&body) {
            Some(dimensions) => Resolved::Parsed(ResolvedImage::remote(dimensions, location)),
            None => {
                debug!("Could not decode image from {location}");
                Resolved::Unparsed(location.to_string())
            }
        })
    }
}

impl DocumentResolver for HttpResolver {
    fn resolve_document(&self, location: &str) -> Result<Resolved<Value>> {
        let body = self.fetch(location)?;
        Ok(document::resolve_bytes(location, &body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_host() {
        let resolver = HttpResolver::with_timeout(Duration::from_millis(200)).unwrap();
        assert!(matches!(
            resolver.resolve_image("http://127.0.0.1:9/scan.png"),
            Err(ConvertError::Http(_))
        ));
    }
}
