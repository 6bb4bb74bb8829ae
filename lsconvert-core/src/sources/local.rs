//! File system resolver

use super::{document, DocumentResolver, ImageResolver, Resolved, ResolvedImage};
use crate::error::Result;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Reads images and documents from local files
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalResolver;

impl ImageResolver for LocalResolver {
    fn resolve_image(&self, location: &str) -> Result<Resolved<ResolvedImage>> {
        let path = Path::new(location);
        fs::metadata(path)?;

        Ok(match read_dimensions(path) {
            Some(dimensions) => Resolved::Parsed(ResolvedImage::local(dimensions, path)),
            None => Resolved::Unparsed(location.to_string()),
        })
    }
}

impl DocumentResolver for LocalResolver {
    fn resolve_document(&self, location: &str) -> Result<Resolved<Value>> {
        let bytes = fs::read(location)?;
        debug!("Read {} bytes from {location}", bytes.len());
        Ok(document::resolve_bytes(location, &bytes))
    }
}

#[cfg(feature = "external-images")]
fn read_dimensions(path: &Path) -> Option<crate::geometry::ImageDimensions> {
    match image::image_dimensions(path) {
        Ok((width, height)) => crate::geometry::ImageDimensions::new(width, height).ok(),
        Err(e) => {
            debug!("Could not read image {}: {e}", path.display());
            None
        }
    }
}

#[cfg(not(feature = "external-images"))]
fn read_dimensions(path: &Path) -> Option<crate::geometry::ImageDimensions> {
    debug!(
        "Cannot read {}: built without the `external-images` feature",
        path.display()
    );
    None
}
