//! Image and document sources
//!
//! Converters work on in-memory values. This module turns locations (file
//! paths, and URLs with the `remote` feature) into those values:
//!
//! - images are opened only to read their pixel dimensions
//! - documents are parsed from JSON, XML (as a nested mapping) or Tesseract TSV
//!
//! Parsing is soft: a source that exists but cannot be decoded resolves to
//! [`Resolved::Unparsed`] and the converter reports it with the matching
//! input error. Only failures to reach the source (missing file, HTTP error)
//! are returned as errors by the resolvers themselves.

use crate::converter::{Conversion, Converter};
use crate::error::Result;
use crate::geometry::ImageDimensions;
use crate::ids::IdGenerator;
use serde_json::Value;
use std::path::PathBuf;

pub mod document;
#[cfg(feature = "remote")]
pub mod http;
pub mod local;
pub mod request;
pub mod tsv;
pub mod xml;

pub use document::DocumentKind;
#[cfg(feature = "remote")]
pub use http::HttpResolver;
pub use local::LocalResolver;
pub use request::ConversionRequest;

/// Outcome of soft parsing: the parsed value or the input it came from
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<T> {
    Parsed(T),
    Unparsed(String),
}

impl<T> Resolved<T> {
    pub fn is_parsed(&self) -> bool {
        matches!(self, Resolved::Parsed(_))
    }

    pub fn as_parsed(&self) -> Option<&T> {
        match self {
            Resolved::Parsed(value) => Some(value),
            Resolved::Unparsed(_) => None,
        }
    }

    pub fn parsed(self) -> Option<T> {
        match self {
            Resolved::Parsed(value) => Some(value),
            Resolved::Unparsed(_) => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Resolved<U> {
        match self {
            Resolved::Parsed(value) => Resolved::Parsed(f(value)),
            Resolved::Unparsed(raw) => Resolved::Unparsed(raw),
        }
    }
}

/// Where an image came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOrigin {
    Local(PathBuf),
    Remote(String),
    /// Dimensions given directly, no location to record
    InMemory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    pub dimensions: ImageDimensions,
    pub origin: ImageOrigin,
}

impl ResolvedImage {
    pub fn in_memory(dimensions: ImageDimensions) -> Self {
        Self {
            dimensions,
            origin: ImageOrigin::InMemory,
        }
    }

    pub fn local(dimensions: ImageDimensions, path: impl Into<PathBuf>) -> Self {
        Self {
            dimensions,
            origin: ImageOrigin::Local(path.into()),
        }
    }

    pub fn remote(dimensions: ImageDimensions, url: impl Into<String>) -> Self {
        Self {
            dimensions,
            origin: ImageOrigin::Remote(url.into()),
        }
    }
}

/// Reads image dimensions from a location
pub trait ImageResolver {
    fn resolve_image(&self, location: &str) -> Result<Resolved<ResolvedImage>>;
}

/// Reads and parses a document from a location
pub trait DocumentResolver {
    fn resolve_document(&self, location: &str) -> Result<Resolved<Value>>;
}

/// Whether a location is fetched over the network
pub fn is_remote(location: &str) -> bool {
    location.starts_with("http")
}

/// Resolver picking the network or the file system by location
#[derive(Debug, Clone)]
pub struct SourceResolver {
    local: LocalResolver,
    #[cfg(feature = "remote")]
    http: HttpResolver,
}

impl SourceResolver {
    pub fn new() -> Result<Self> {
        Ok(Self {
            local: LocalResolver,
            #[cfg(feature = "remote")]
            http: HttpResolver::new()?,
        })
    }

    #[cfg(feature = "remote")]
    fn remote_image(&self, url: &str) -> Result<Resolved<ResolvedImage>> {
        self.http.resolve_image(url)
    }

    #[cfg(not(feature = "remote"))]
    fn remote_image(&self, url: &str) -> Result<Resolved<ResolvedImage>> {
        Err(remote_disabled(url))
    }

    #[cfg(feature = "remote")]
    fn remote_document(&self, url: &str) -> Result<Resolved<Value>> {
        self.http.resolve_document(url)
    }

    #[cfg(not(feature = "remote"))]
    fn remote_document(&self, url: &str) -> Result<Resolved<Value>> {
        Err(remote_disabled(url))
    }
}

#[cfg(not(feature = "remote"))]
fn remote_disabled(url: &str) -> crate::error::ConvertError {
    crate::error::ConvertError::Http(format!(
        "cannot fetch {url}: built without the `remote` feature"
    ))
}

impl ImageResolver for SourceResolver {
    fn resolve_image(&self, location: &str) -> Result<Resolved<ResolvedImage>> {
        if is_remote(location) {
            self.remote_image(location)
        } else {
            self.local.resolve_image(location)
        }
    }
}

impl DocumentResolver for SourceResolver {
    fn resolve_document(&self, location: &str) -> Result<Resolved<Value>> {
        if is_remote(location) {
            self.remote_document(location)
        } else {
            self.local.resolve_document(location)
        }
    }
}

/// Resolve an image and a document by location, then convert
///
/// A remote image is recorded as the task's source when `url` is not given.
pub fn resolve_and_convert<R, G>(
    converter: &Converter<G>,
    resolver: &R,
    image: &str,
    input: &str,
    url: Option<&str>,
) -> Result<Conversion>
where
    R: ImageResolver + DocumentResolver,
    G: IdGenerator,
{
    let image = resolver.resolve_image(image)?;
    let input = resolver.resolve_document(input)?;
    converter.convert(&image, &input, url)
}

/// Read the dimensions of an encoded image
#[cfg(feature = "external-images")]
pub(crate) fn dimensions_from_bytes(bytes: &[u8]) -> Option<ImageDimensions> {
    let (width, height) = image::ImageReader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()?;
    ImageDimensions::new(width, height).ok()
}
