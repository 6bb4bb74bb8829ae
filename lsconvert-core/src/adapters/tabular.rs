//! Tesseract `image_to_data` output
//!
//! The input is a mapping of parallel columns, one row per detected element
//! at any depth of the page hierarchy:
//!
//! ```json
//! {
//!   "level":     [1, 2, 3, 4, 5, 5],
//!   "page_num":  [1, 1, 1, 1, 1, 1],
//!   "block_num": [0, 1, 1, 1, 1, 1],
//!   "par_num":   [0, 0, 1, 1, 1, 1],
//!   "line_num":  [0, 0, 0, 1, 1, 1],
//!   "word_num":  [0, 0, 0, 0, 1, 2],
//!   "left": [...], "top": [...], "width": [...], "height": [...],
//!   "conf": ["-1", "-1", "-1", "-1", 96, 91],
//!   "text": ["", "", "", "", "Hello", "world"]
//! }
//! ```
//!
//! Every row at the target level becomes a region. Its text and score come
//! from all rows sharing its grouping key: the numbering columns from the
//! page down to the target level. Numbering columns above the target that
//! are absent from the input are left out of the key. Matching on the whole
//! path keeps `line_num = 1` of one block apart from `line_num = 1` of the
//! next, which matching on the target column alone would merge.

use super::{text_of, FormatAdapter};
use crate::error::{ConvertError, Result};
use crate::format::Level;
use crate::geometry::{coerce_int, ImageDimensions, PixelRect};
use crate::ids::IdGenerator;
use crate::options::ConvertOptions;
use crate::result::{join_text, Region};
use crate::score::mean;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Columns every tabular input must carry
pub const REQUIRED_COLUMNS: [&str; 7] = ["level", "left", "top", "width", "height", "text", "conf"];

/// Confidence reported for rows without a recognition score
pub const SENTINEL_CONFIDENCE: f64 = -1.0;

/// Text of the rows of one region is joined with this
pub const WORD_DELIMITER: &str = " ";

#[derive(Debug, Clone, Copy, Default)]
pub struct TabularAdapter;

/// A validated Tesseract table
#[derive(Debug, Clone, PartialEq)]
pub struct TabularDocument {
    pub level: Level,
    pub rows: Vec<TabularRow>,
    /// Rows at the target level, with their pixel boxes
    pub targets: Vec<(usize, PixelRect)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TabularRow {
    /// Numbering of the row from the page down to the target level
    pub key: Vec<i64>,
    pub text: String,
    /// Confidence as reported, `None` for the sentinel
    pub confidence: Option<f64>,
}

impl FormatAdapter for TabularAdapter {
    type Document = TabularDocument;

    fn validate(&self, input: &Value, options: &ConvertOptions) -> Result<TabularDocument> {
        let level = options.resolve_target_level()?;
        let table = input
            .as_object()
            .ok_or_else(|| ConvertError::malformed("Tesseract data must be a mapping of columns"))?;

        let levels = column(table, "level")?;
        let row_count = levels.len();

        let mut key_columns = Vec::new();
        for parent in level.path() {
            let name = parent.column();
            if parent != level && !table.contains_key(name) {
                continue;
            }
            key_columns.push((name, column(table, name)?));
        }

        let texts = column(table, "text")?;
        let confs = column(table, "conf")?;
        let lefts = column(table, "left")?;
        let tops = column(table, "top")?;
        let widths = column(table, "width")?;
        let heights = column(table, "height")?;

        let all_columns = REQUIRED_COLUMNS
            .iter()
            .copied()
            .zip([levels, lefts, tops, widths, heights, texts, confs])
            .chain(key_columns.iter().copied());
        for (name, values) in all_columns {
            if values.len() != row_count {
                return Err(ConvertError::malformed(format!(
                    "column `{name}` has {} rows, expected {row_count}",
                    values.len()
                )));
            }
        }

        let mut rows = Vec::with_capacity(row_count);
        let mut targets = Vec::new();
        for i in 0..row_count {
            let key = key_columns
                .iter()
                .map(|(name, values)| coerce_int(name, &values[i]))
                .collect::<Result<Vec<_>>>()?;

            rows.push(TabularRow {
                key,
                text: text_of("text", &texts[i])?,
                confidence: parse_confidence(i, &confs[i])?,
            });

            if coerce_int("level", &levels[i])? == level.ordinal() {
                let rect = PixelRect::new(
                    coerce_int("left", &lefts[i])?,
                    coerce_int("top", &tops[i])?,
                    coerce_int("width", &widths[i])?,
                    coerce_int("height", &heights[i])?,
                );
                targets.push((i, rect));
            }
        }

        Ok(TabularDocument {
            level,
            rows,
            targets,
        })
    }

    fn convert<G>(&self, document: TabularDocument, image: ImageDimensions, ids: &G) -> Vec<Region>
    where
        G: IdGenerator + ?Sized,
    {
        let mut groups: HashMap<&[i64], Vec<&TabularRow>> = HashMap::new();
        for row in &document.rows {
            groups.entry(row.key.as_slice()).or_default().push(row);
        }

        document
            .targets
            .iter()
            .map(|(index, rect)| {
                let members = groups
                    .get(document.rows[*index].key.as_slice())
                    .map(Vec::as_slice)
                    .unwrap_or_default();

                let text = join_text(members.iter().map(|row| row.text.as_str()), WORD_DELIMITER);
                let score = mean(
                    members
                        .iter()
                        .filter_map(|row| row.confidence)
                        .map(|confidence| confidence / 100.0),
                );

                Region::new(ids.next_id(), rect.normalize(image), text, score)
            })
            .collect()
    }
}

fn column<'a>(table: &'a Map<String, Value>, name: &str) -> Result<&'a [Value]> {
    match table.get(name) {
        Some(Value::Array(values)) => Ok(values.as_slice()),
        Some(_) => Err(ConvertError::malformed(format!(
            "column `{name}` must be a sequence"
        ))),
        None => Err(ConvertError::malformed(format!("missing column `{name}`"))),
    }
}

/// Parse a raw confidence; the sentinel `-1` yields `None`
fn parse_confidence(row: usize, value: &Value) -> Result<Option<f64>> {
    let confidence = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    match confidence {
        Some(c) if c == SENTINEL_CONFIDENCE => Ok(None),
        Some(c) if c.is_finite() => Ok(Some(c)),
        _ => Err(ConvertError::InvalidConfidence {
            row,
            value: value.to_string(),
        }),
    }
}
