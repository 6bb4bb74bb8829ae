//! # lsconvert
//!
//! Convert OCR engine output into Label Studio pre-annotations.
//!
//! ## Features
//!
//! - **Tesseract**: `image_to_data` columns (dict or TSV), grouped at any level
//!   from page down to word
//! - **ABBYY**: single-page JSON with blocks and cross-referenced paragraphs
//! - **Transkribus**: ALTO XML with text blocks and lines
//! - **Unified output**: one rectangle and one transcription per region, box
//!   coordinates as percentages of the image, per-region and document scores
//! - **Sources**: images and documents read from disk, or over HTTP with the
//!   `remote` feature
//!
//! ## Quick Start
//!
//! ```rust
//! use lsconvert::{Converter, ImageDimensions, InputFormat, Result};
//! use serde_json::json;
//!
//! # fn main() -> Result<()> {
//! let tesseract = json!({
//!     "level": [2, 5, 5],
//!     "block_num": [1, 1, 1],
//!     "left": [10, 10, 60], "top": [10, 10, 10],
//!     "width": [100, 45, 50], "height": [20, 20, 20],
//!     "conf": ["-1", 90, 80],
//!     "text": ["", "foo", "bar"]
//! });
//!
//! let converter = Converter::new(InputFormat::Tabular);
//! let result = converter.convert_document(
//!     ImageDimensions::new(200, 100)?,
//!     &tesseract,
//!     Some("https://example.com/page.png"),
//! )?;
//!
//! assert_eq!(result.regions[0].text, "foo bar");
//! let task = result.to_json().expect("serializable task");
//! assert_eq!(task["data"]["ocr"], "https://example.com/page.png");
//! # Ok(())
//! # }
//! ```
//!
//! ### From files
//!
//! ```rust,no_run
//! use lsconvert::{resolve_and_convert, Converter, SourceResolver};
//!
//! # fn main() -> lsconvert::Result<()> {
//! let converter = Converter::from_tag("transkribus")?;
//! let resolver = SourceResolver::new()?;
//! let conversion = resolve_and_convert(
//!     &converter,
//!     &resolver,
//!     "scans/page-1.jpg",
//!     "alto/page-1.xml",
//!     Some("https://storage.example.com/page-1.jpg"),
//! )?;
//! println!("{}", serde_json::to_string_pretty(&conversion.result).unwrap());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`converter`] - Entry point: shared checks and adapter selection
//! - [`adapters`] - Per-format validation and hierarchy walk
//! - [`geometry`] - Pixel boxes to percentage-of-image boxes
//! - [`result`] - Regions and the Label Studio task layout
//! - [`sources`] - Image and document resolution, batch requests
//! - [`options`] - Conversion options

pub mod adapters;
pub mod converter;
pub mod diagnostic;
pub mod error;
pub mod format;
pub mod geometry;
pub mod ids;
pub mod options;
pub mod result;
pub mod score;
pub mod sources;

pub use adapters::{AltoAdapter, FormatAdapter, HierarchicalAdapter, TabularAdapter};
pub use converter::{source_url, Conversion, Converter};
pub use diagnostic::Diagnostic;
pub use error::{ConvertError, Result};
pub use format::{InputFormat, Level};
pub use geometry::{normalize, BoundingBox, ImageDimensions, PixelRect};
pub use ids::{IdGenerator, SequentialIdGenerator, UuidIdGenerator, DEFAULT_ID_LENGTH};
pub use options::ConvertOptions;
pub use result::{ConversionResult, LabelStudioTask, Region, ResultEntry};
pub use score::mean;
#[cfg(feature = "remote")]
pub use sources::HttpResolver;
pub use sources::{
    resolve_and_convert, ConversionRequest, DocumentResolver, ImageOrigin, ImageResolver,
    LocalResolver, Resolved, ResolvedImage, SourceResolver,
};

/// Current version of lsconvert
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
