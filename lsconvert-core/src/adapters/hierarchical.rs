//! ABBYY JSON output
//!
//! Blocks live in the page layout and carry the geometry and confidence.
//! Paragraphs live in a separate content section and point back at the block
//! holding them through `layoutReferences`. Each block becomes one region
//! whose text is the newline-joined text of its paragraphs.

use super::{field, text_of, FormatAdapter};
use crate::error::{ConvertError, Result};
use crate::geometry::{coerce_int, ImageDimensions, PixelRect};
use crate::ids::IdGenerator;
use crate::options::ConvertOptions;
use crate::result::Region;
use serde_json::Value;
use std::collections::HashMap;

/// Paragraph texts of one block are joined with this
pub const PARAGRAPH_DELIMITER: &str = "\n";

#[derive(Debug, Clone, Copy, Default)]
pub struct HierarchicalAdapter;

/// A validated single-page ABBYY document
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchicalDocument {
    pub blocks: Vec<TextBlock>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub id: String,
    pub rect: PixelRect,
    pub confidence: f64,
    /// Paragraphs referencing this block, in content order
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub text: String,
    pub role: Option<String>,
}

impl FormatAdapter for HierarchicalAdapter {
    type Document = HierarchicalDocument;

    fn validate(&self, input: &Value, _options: &ConvertOptions) -> Result<HierarchicalDocument> {
        let pages = sequence(field(input, "layout", "document")?, "pages", "layout")?;
        let page = match pages {
            [page] => page,
            [] => return Err(ConvertError::malformed("layout has no pages")),
            _ => return Err(ConvertError::MultipageAbbyy(pages.len())),
        };

        let paragraphs = sequence(field(input, "content", "document")?, "paragraphs", "content")?;
        let mut references = Vec::with_capacity(paragraphs.len());
        for (index, paragraph) in paragraphs.iter().enumerate() {
            let refs: &[Value] = match paragraph.get("layoutReferences") {
                Some(Value::Array(refs)) => refs.as_slice(),
                None | Some(Value::Null) => &[],
                Some(_) => {
                    return Err(ConvertError::malformed(format!(
                        "layoutReferences of paragraph {index} must be a sequence"
                    )))
                }
            };
            match refs {
                [reference] => {
                    let context = format!("layout reference of paragraph {index}");
                    references.push(block_key(field(reference, "blockId", &context)?)?);
                }
                _ => {
                    return Err(ConvertError::MultipleBlocks {
                        paragraph: index,
                        references: refs.len(),
                    })
                }
            }
        }

        let mut blocks: Vec<TextBlock> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for (index, raw) in sequence(page, "texts", "page")?.iter().enumerate() {
            let block = parse_block(index, raw)?;
            match positions.get(&block.id) {
                Some(&position) => blocks[position] = block,
                None => {
                    positions.insert(block.id.clone(), blocks.len());
                    blocks.push(block);
                }
            }
        }

        for (index, (paragraph, block_id)) in paragraphs.iter().zip(references).enumerate() {
            let position = positions.get(&block_id).copied().ok_or_else(|| {
                ConvertError::malformed(format!(
                    "paragraph {index} references unknown block `{block_id}`"
                ))
            })?;

            let role = match paragraph.get("role") {
                None | Some(Value::Null) => None,
                Some(role) => Some(text_of("role", role)?),
            };
            blocks[position].paragraphs.push(Paragraph {
                text: text_of("text", field(paragraph, "text", &format!("paragraph {index}"))?)?,
                role,
            });
        }

        Ok(HierarchicalDocument { blocks })
    }

    fn convert<G>(
        &self,
        document: HierarchicalDocument,
        image: ImageDimensions,
        ids: &G,
    ) -> Vec<Region>
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
                    block.paragraphs.iter().map(|p| p.text.as_str()),
                    PARAGRAPH_DELIMITER,
                    block.confidence,
                )
            })
            .collect()
    }
}

fn sequence<'a>(parent: &'a Value, key: &str, context: &str) -> Result<&'a [Value]> {
    match field(parent, key, context)? {
        Value::Array(items) => Ok(items.as_slice()),
        _ => Err(ConvertError::malformed(format!(
            "`{key}` in {context} must be a sequence"
        ))),
    }
}

/// Block identifiers are compared by their string form
fn block_key(value: &Value) -> Result<String> {
    match value {
        Value::String(id) => Ok(id.clone()),
        Value::Number(id) => Ok(id.to_string()),
        other => Err(ConvertError::malformed(format!(
            "block identifier must be a string or a number, got {other}"
        ))),
    }
}

fn parse_block(index: usize, raw: &Value) -> Result<TextBlock> {
    let context = format!("block {index}");
    let position = field(raw, "position", &context)?;
    let edge = |name: &str| -> Result<i64> { coerce_int(name, field(position, name, &context)?) };

    let rect = PixelRect::from_edges(edge("l")?, edge("t")?, edge("r")?, edge("b")?)
        .ok_or_else(|| {
            ConvertError::malformed(format!("position of {context} is out of range"))
        })?;

    let raw_confidence = field(raw, "confidence", &context)?;
    let confidence = match raw_confidence {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|c| c.is_finite())
    .ok_or_else(|| {
        ConvertError::malformed(format!(
            "confidence of {context} must be a number, got {raw_confidence}"
        ))
    })?;

    Ok(TextBlock {
        id: block_key(field(raw, "id", &context)?)?,
        rect,
        confidence,
        paragraphs: Vec::new(),
    })
}
