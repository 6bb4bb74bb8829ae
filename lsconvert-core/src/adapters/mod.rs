//! Per-format converters
//!
//! Each supported OCR format has an adapter implementing [`FormatAdapter`].
//! Conversion happens in two steps:
//!
//! - **validate** walks the raw document, checks its structure and coerces
//!   every value the conversion will need into a typed document. All input
//!   errors surface here, before any region exists.
//! - **convert** turns the typed document into regions. It cannot fail.
//!
//! The set of adapters is closed: [`crate::Converter`] picks one by matching
//! on [`crate::InputFormat`] and calls it through static dispatch.

use crate::error::{ConvertError, Result};
use crate::geometry::ImageDimensions;
use crate::ids::IdGenerator;
use crate::options::ConvertOptions;
use crate::result::Region;
use serde_json::Value;

pub mod alto;
pub mod hierarchical;
pub mod tabular;

pub use alto::AltoAdapter;
pub use hierarchical::HierarchicalAdapter;
pub use tabular::TabularAdapter;

/// Conversion contract shared by all input formats
pub trait FormatAdapter {
    /// Validated, typed form of the input
    type Document;

    /// Check `input` and extract everything the conversion needs
    fn validate(&self, input: &Value, options: &ConvertOptions) -> Result<Self::Document>;

    /// Build the regions of a validated document
    fn convert<G>(&self, document: Self::Document, image: ImageDimensions, ids: &G) -> Vec<Region>
    where
        G: IdGenerator + ?Sized;
}

/// Look up `key` in an object, failing with a message naming `context`
pub(crate) fn field<'a>(value: &'a Value, key: &str, context: &str) -> Result<&'a Value> {
    value
        .get(key)
        .ok_or_else(|| ConvertError::malformed(format!("missing `{key}` in {context}")))
}

/// Follow a chain of object keys
pub(crate) fn lookup<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().try_fold(value, |current, key| current.get(*key))
}

/// Treat a value as a list: arrays as-is, `null` as empty, anything else as one item
///
/// XML converted to a mapping only produces a list when an element repeats,
/// so a single child arrives as a bare object.
pub(crate) fn one_or_many(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

/// Read a text value, rejecting anything that is not a string
pub(crate) fn text_of(field: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(text) => Ok(text.clone()),
        other => Err(ConvertError::NonStringText {
            field: field.to_string(),
            value: other.to_string(),
        }),
    }
}
