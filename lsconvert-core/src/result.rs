//! Regions and the Label Studio task they serialize to
//!
//! A [`ConversionResult`] is the terminal output of a conversion. It
//! serializes to the task layout Label Studio imports:
//!
//! ```json
//! {
//!   "data": {"ocr": "https://example.com/page.jpg"},
//!   "predictions": [{"result": [...], "score": 0.91}]
//! }
//! ```
//!
//! Every [`Region`] contributes two entries to `result`: a `rectangle`
//! entry for the box and a `textarea` entry carrying the transcription and
//! its score. Both entries use the region's identifier.

use crate::geometry::BoundingBox;
use crate::score::mean;
use serde::{Deserialize, Serialize, Serializer};

/// `from_name` of the spatial entry
pub const BBOX_FROM_NAME: &str = "bbox";
/// `from_name` of the transcription entry
pub const TRANSCRIPTION_FROM_NAME: &str = "transcription";
/// `to_name` of both entries
pub const IMAGE_TO_NAME: &str = "image";

/// One detected element with its transcription
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub id: String,
    pub bbox: BoundingBox,
    pub text: String,
    pub score: f64,
}

impl Region {
    pub fn new(id: impl Into<String>, bbox: BoundingBox, text: impl Into<String>, score: f64) -> Self {
        Self {
            id: id.into(),
            bbox,
            text: text.into(),
            score,
        }
    }

    /// Create a region whose text is made of several parts
    ///
    /// The parts are joined with `delimiter` and the result is trimmed.
    pub fn from_parts<I, S>(
        id: impl Into<String>,
        bbox: BoundingBox,
        parts: I,
        delimiter: &str,
        score: f64,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(id, bbox, join_text(parts, delimiter), score)
    }

    /// The `rectangle` entry of this region
    pub fn spatial_result(&self) -> ResultEntry {
        ResultEntry {
            id: self.id.clone(),
            from_name: BBOX_FROM_NAME.to_string(),
            to_name: IMAGE_TO_NAME.to_string(),
            kind: ResultKind::Rectangle,
            value: ResultValue::Rectangle(self.bbox),
            score: None,
        }
    }

    /// The `textarea` entry of this region
    pub fn transcription_result(&self) -> ResultEntry {
        ResultEntry {
            id: self.id.clone(),
            from_name: TRANSCRIPTION_FROM_NAME.to_string(),
            to_name: IMAGE_TO_NAME.to_string(),
            kind: ResultKind::Textarea,
            value: ResultValue::Textarea(TextareaValue {
                text: vec![self.text.clone()],
                bbox: self.bbox,
            }),
            score: Some(self.score),
        }
    }
}

/// Join `parts` with `delimiter` and trim surrounding whitespace
pub fn join_text<I, S>(parts: I, delimiter: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = String::new();
    for (i, part) in parts.into_iter().enumerate() {
        if i > 0 {
            joined.push_str(delimiter);
        }
        joined.push_str(part.as_ref());
    }
    joined.trim().to_string()
}

/// Output of one conversion
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    /// Location recorded as the task's `data.ocr`
    pub source_url: Option<String>,
    pub regions: Vec<Region>,
    /// Mean of the region scores, `0.0` without regions
    pub document_score: f64,
}

impl ConversionResult {
    pub fn new(source_url: Option<String>, regions: Vec<Region>) -> Self {
        let document_score = mean(regions.iter().map(|region| region.score));
        Self {
            source_url,
            regions,
            document_score,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// All result entries, two per region, in region order
    pub fn result_entries(&self) -> Vec<ResultEntry> {
        self.regions
            .iter()
            .flat_map(|region| [region.spatial_result(), region.transcription_result()])
            .collect()
    }

    /// Build the Label Studio task for this result
    pub fn to_task(&self) -> LabelStudioTask {
        LabelStudioTask {
            data: TaskData {
                ocr: self.source_url.clone(),
            },
            predictions: vec![Prediction {
                result: self.result_entries(),
                score: self.document_score,
            }],
        }
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self.to_task())
    }
}

impl Serialize for ConversionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_task().serialize(serializer)
    }
}

/// A Label Studio task with one prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelStudioTask {
    pub data: TaskData,
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskData {
    pub ocr: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub result: Vec<ResultEntry>,
    pub score: f64,
}

/// One entry of a prediction's `result` list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub id: String,
    pub from_name: String,
    pub to_name: String,
    #[serde(rename = "type")]
    pub kind: ResultKind,
    pub value: ResultValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Rectangle,
    Textarea,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultValue {
    Textarea(TextareaValue),
    Rectangle(BoundingBox),
}

/// Transcription value: the text as a one-element list plus the box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextareaValue {
    pub text: Vec<String>,
    #[serde(flatten)]
    pub bbox: BoundingBox,
}
