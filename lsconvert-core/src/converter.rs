//! Conversion entry point
//!
//! A [`Converter`] is bound to one input format. It checks what every format
//! needs (a mapping with content, an image with usable dimensions), picks the
//! recorded source location and hands the document to the matching adapter.

use crate::adapters::{AltoAdapter, FormatAdapter, HierarchicalAdapter, TabularAdapter};
use crate::diagnostic::Diagnostic;
use crate::error::{ConvertError, Result};
use crate::format::InputFormat;
use crate::geometry::ImageDimensions;
use crate::ids::{IdGenerator, UuidIdGenerator};
use crate::options::ConvertOptions;
use crate::result::{ConversionResult, Region};
use crate::sources::{ImageOrigin, Resolved, ResolvedImage};
use serde_json::Value;
use tracing::{debug, trace};

/// Output of [`Converter::convert`]: the result and any advisories raised on the way
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub result: ConversionResult,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone)]
pub struct Converter<G = UuidIdGenerator> {
    format: InputFormat,
    options: ConvertOptions,
    ids: G,
}

impl Converter {
    pub fn new(format: InputFormat) -> Self {
        Self {
            format,
            options: ConvertOptions::default(),
            ids: UuidIdGenerator::default(),
        }
    }

    /// Create a converter from a format tag such as `"tesseract"`
    pub fn from_tag(tag: &str) -> Result<Self> {
        Ok(Self::new(tag.parse()?))
    }
}

impl<G: IdGenerator> Converter<G> {
    pub fn format(&self) -> InputFormat {
        self.format
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the source of region identifiers
    pub fn with_id_generator<H: IdGenerator>(self, ids: H) -> Converter<H> {
        Converter {
            format: self.format,
            options: self.options,
            ids,
        }
    }

    /// Convert a resolved document against a resolved image
    ///
    /// `url`, when given, is recorded as the task's source. Otherwise the
    /// image's own location is used; converting a local file this way
    /// yields a [`Diagnostic::UrlNotSet`].
    pub fn convert(
        &self,
        image: &Resolved<ResolvedImage>,
        input: &Resolved<Value>,
        url: Option<&str>,
    ) -> Result<Conversion> {
        let document = match input {
            Resolved::Parsed(document @ Value::Object(_)) => document,
            Resolved::Parsed(other) => {
                return Err(ConvertError::IncorrectInputDataFormat(format!(
                    "got {}",
                    kind_of(other)
                )))
            }
            Resolved::Unparsed(raw) => {
                return Err(ConvertError::IncorrectInputDataFormat(format!(
                    "could not read a document from `{raw}`"
                )))
            }
        };

        let image = match image {
            Resolved::Parsed(image) => image,
            Resolved::Unparsed(raw) => {
                return Err(ConvertError::IncorrectImageFormat(format!(
                    "could not read an image from `{raw}`"
                )))
            }
        };

        let mut diagnostics = Vec::new();
        let source = match (url, &image.origin) {
            (Some(url), _) => Some(url.to_string()),
            (None, ImageOrigin::Remote(url)) => Some(url.clone()),
            (None, ImageOrigin::Local(path)) => {
                diagnostics.push(Diagnostic::UrlNotSet { path: path.clone() });
                Some(path.display().to_string())
            }
            (None, ImageOrigin::InMemory) => None,
        };

        let result = self.convert_document(image.dimensions, document, source.as_deref())?;
        Ok(Conversion {
            result,
            diagnostics,
        })
    }

    /// Convert an in-memory document against known image dimensions
    pub fn convert_document(
        &self,
        image: ImageDimensions,
        input: &Value,
        url: Option<&str>,
    ) -> Result<ConversionResult> {
        let table = input.as_object().ok_or_else(|| {
            ConvertError::IncorrectInputDataFormat(format!("got {}", kind_of(input)))
        })?;
        if table.is_empty() {
            return Err(ConvertError::EmptyInputData);
        }

        debug!(
            "Converting {} output against a {}x{} image",
            self.format.engine_name(),
            image.width(),
            image.height()
        );

        let regions = match self.format {
            InputFormat::Tabular => self.run(TabularAdapter, input, image)?,
            InputFormat::Hierarchical => self.run(HierarchicalAdapter, input, image)?,
            InputFormat::Alto => self.run(AltoAdapter, input, image)?,
        };

        let result = ConversionResult::new(url.map(str::to_string), regions);
        debug!(
            "Produced {} regions, document score {:.3}",
            result.regions.len(),
            result.document_score
        );
        Ok(result)
    }

    fn run<A: FormatAdapter>(
        &self,
        adapter: A,
        input: &Value,
        image: ImageDimensions,
    ) -> Result<Vec<Region>> {
        let document = adapter.validate(input, &self.options)?;
        trace!("{} input validated", self.format);
        Ok(adapter.convert(document, image, &self.ids))
    }
}

/// Read an optional source URL from a loosely typed value
///
/// `null` counts as absent; anything other than a string is rejected.
pub fn source_url(url: Option<&Value>) -> Result<Option<&str>> {
    match url {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(url)) => Ok(Some(url.as_str())),
        Some(other) => Err(ConvertError::IncorrectURLFormat(other.to_string())),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
