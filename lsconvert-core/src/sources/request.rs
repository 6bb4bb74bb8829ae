//! Loosely typed conversion requests
//!
//! A request names everything one conversion needs, the way a batch
//! manifest spells it:
//!
//! ```json
//! {
//!   "format": "tesseract",
//!   "image": "scans/page-1.png",
//!   "input": "ocr/page-1.tsv",
//!   "url": "https://storage.example.com/page-1.png",
//!   "options": {"per_level": 4}
//! }
//! ```
//!
//! `image` is a location or a `{"width", "height"}` object. `input` is a
//! location or the document itself.

use super::{DocumentResolver, ImageResolver, Resolved, ResolvedImage};
use crate::converter::{source_url, Conversion, Converter};
use crate::error::{ConvertError, Result};
use crate::geometry::ImageDimensions;
use crate::ids::{IdGenerator, UuidIdGenerator};
use crate::options::ConvertOptions;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub format: String,
    pub image: Value,
    pub input: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Value>,
}

impl ConversionRequest {
    /// Run the request with random region identifiers
    pub fn execute<R>(&self, resolver: &R) -> Result<Conversion>
    where
        R: ImageResolver + DocumentResolver,
    {
        self.execute_with_ids(resolver, UuidIdGenerator::default())
    }

    pub fn execute_with_ids<R, G>(&self, resolver: &R, ids: G) -> Result<Conversion>
    where
        R: ImageResolver + DocumentResolver,
        G: IdGenerator,
    {
        let converter = Converter::from_tag(&self.format)?
            .with_options(ConvertOptions::from_map(&self.options)?)
            .with_id_generator(ids);
        let url = source_url(self.url.as_ref())?;

        let image = match &self.image {
            Value::String(location) => resolver.resolve_image(location)?,
            Value::Object(size) => Resolved::Parsed(ResolvedImage::in_memory(dimensions(size)?)),
            other => Resolved::Unparsed(other.to_string()),
        };

        let input = match &self.input {
            Value::String(location) => resolver.resolve_document(location)?,
            inline => Resolved::Parsed(inline.clone()),
        };

        converter.convert(&image, &input, url)
    }
}

fn dimensions(size: &Map<String, Value>) -> Result<ImageDimensions> {
    match (size.get("width"), size.get("height")) {
        (Some(width), Some(height)) => ImageDimensions::from_values(width, height),
        _ => Err(ConvertError::IncorrectImageFormat(
            "image object must have `width` and `height`".to_string(),
        )),
    }
}
