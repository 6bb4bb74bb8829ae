//! Transkribus ALTO output
//!
//! The XML is read as a nested mapping (attributes under `@name`, repeated
//! elements as lists) and walked along `alto/Layout/Page/PrintSpace`. Each
//! `TextBlock` becomes a region; its `TextLine`s give the text, one line per
//! row. ALTO carries no confidence, so every region scores zero.

use super::{field, one_or_many, text_of, FormatAdapter};
use crate::error::{ConvertError, Result};
use crate::geometry::{coerce_int, ImageDimensions, PixelRect};
use crate::ids::IdGenerator;
use crate::options::ConvertOptions;
use crate::result::{join_text, Region};
use serde_json::Value;

/// Elements leading from the root to the text blocks
pub const BLOCK_PATH: [&str; 5] = ["alto", "Layout", "Page", "PrintSpace", "TextBlock"];

/// Lines of one block are joined with this
pub const LINE_DELIMITER: &str = "\n";

/// Strings within a line are joined with this
pub const STRING_DELIMITER: &str = " ";

#[derive(Debug, Clone, Copy, Default)]
pub struct AltoAdapter;

/// A validated ALTO page
#[derive(Debug, Clone, PartialEq)]
pub struct AltoDocument {
    pub blocks: Vec<AltoBlock>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AltoBlock {
    pub rect: PixelRect,
    pub lines: Vec<String>,
}

impl FormatAdapter for AltoAdapter {
    type Document = AltoDocument;

    fn validate(&self, input: &Value, _options: &ConvertOptions) -> Result<AltoDocument> {
        let blocks = text_blocks(input)?
            .into_iter()
            .enumerate()
            .map(|(index, block)| parse_block(index, block))
            .collect::<Result<Vec<_>>>()?;

        Ok(AltoDocument { blocks })
    }

    fn convert<G>(&self, document: AltoDocument, image: ImageDimensions, ids: &G) -> Vec<Region>
    where
        G: IdGenerator + ?Sized,
    {
        document
            .blocks
            .into_iter()
            .map(|block| {
                Region::from_parts(
                    ids.next_id(),
                    block.rect.normalize(image),
                    &block.lines,
                    LINE_DELIMITER,
                    0.0,
                )
            })
            .collect()
    }
}

/// Walk to the `TextBlock` elements of the single page
fn text_blocks(input: &Value) -> Result<Vec<&Value>> {
    let mut current = input;
    for (depth, name) in BLOCK_PATH.iter().enumerate() {
        let next = current.get(*name).ok_or_else(|| {
            ConvertError::malformed(format!(
                "missing {}. Is it valid output from Transkribus?",
                BLOCK_PATH[..=depth].join("/")
            ))
        })?;

        if *name == "TextBlock" {
            return Ok(one_or_many(next));
        }

        current = match next {
            Value::Array(items) if items.len() == 1 => &items[0],
            Value::Array(items) => {
                return Err(ConvertError::malformed(format!(
                    "expected a single `{name}`, found {}",
                    items.len()
                )))
            }
            other => other,
        };
    }

    Err(ConvertError::malformed("no TextBlock found"))
}

fn parse_block(index: usize, block: &Value) -> Result<AltoBlock> {
    let context = format!("TextBlock {index}");
    let attribute = |name: &str| -> Result<i64> { coerce_int(name, field(block, name, &context)?) };

    let rect = PixelRect::new(
        attribute("@HPOS")?,
        attribute("@VPOS")?,
        attribute("@WIDTH")?,
        attribute("@HEIGHT")?,
    );

    let lines = one_or_many(block.get("TextLine").unwrap_or(&Value::Null))
        .into_iter()
        .enumerate()
        .map(|(line_index, line)| -> Result<String> {
            let context = format!("TextLine {line_index} of {context}");
            let strings = one_or_many(line.get("String").unwrap_or(&Value::Null))
                .into_iter()
                .map(|string| text_of("@CONTENT", field(string, "@CONTENT", &context)?))
                .collect::<Result<Vec<_>>>()?;
            Ok(join_text(strings, STRING_DELIMITER))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(AltoBlock { rect, lines })
}
