//! Document formats accepted by the resolvers

use super::{tsv, xml, Resolved};
use crate::error::{ConvertError, Result};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Json,
    /// XML read as a nested mapping
    Xml,
    /// Tesseract `image_to_data` TSV
    Tsv,
}

impl DocumentKind {
    /// Guess the kind from the extension of a path or URL
    pub fn from_location(location: &str) -> Option<Self> {
        let path = location
            .split(['?', '#'])
            .next()
            .unwrap_or(location);
        let extension = Path::new(path).extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(DocumentKind::Json),
            "xml" | "alto" => Some(DocumentKind::Xml),
            "tsv" => Some(DocumentKind::Tsv),
            _ => None,
        }
    }

    /// Guess the kind from the content: markup is XML, anything else JSON
    pub fn sniff(text: &str) -> Self {
        if text.trim_start().starts_with('<') {
            DocumentKind::Xml
        } else {
            DocumentKind::Json
        }
    }

    pub fn parse(self, text: &str) -> Result<Value> {
        match self {
            DocumentKind::Json => serde_json::from_str(text)
                .map_err(|e| ConvertError::malformed(format!("invalid JSON: {e}"))),
            DocumentKind::Xml => xml::xml_to_value(text),
            DocumentKind::Tsv => tsv::tsv_to_value(text),
        }
    }
}

/// Parse raw document bytes read from `location`
///
/// Anything that cannot be decoded resolves to [`Resolved::Unparsed`].
pub(crate) fn resolve_bytes(location: &str, bytes: &[u8]) -> Resolved<Value> {
    let text = match std::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            debug!("{location} is not UTF-8 text: {e}");
            return Resolved::Unparsed(location.to_string());
        }
    };

    let kind = DocumentKind::from_location(location).unwrap_or_else(|| DocumentKind::sniff(text));
    match kind.parse(text) {
        Ok(value) => Resolved::Parsed(value),
        Err(e) => {
            debug!("Could not parse {location} as {kind:?}: {e}");
            Resolved::Unparsed(location.to_string())
        }
    }
}
