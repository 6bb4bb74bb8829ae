//! Input formats and Tesseract hierarchy levels

use crate::error::{ConvertError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported OCR output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// Tesseract `image_to_data` output: parallel columns, one row per element
    #[serde(alias = "tesseract")]
    Tabular,
    /// ABBYY JSON: blocks in the layout, paragraphs in the content
    #[serde(alias = "abbyy")]
    Hierarchical,
    /// Transkribus ALTO XML, parsed into a nested mapping
    #[serde(alias = "transkribus")]
    Alto,
}

impl InputFormat {
    pub const ALL: [InputFormat; 3] = [
        InputFormat::Tabular,
        InputFormat::Hierarchical,
        InputFormat::Alto,
    ];

    /// Canonical tag of the format
    pub fn tag(&self) -> &'static str {
        match self {
            InputFormat::Tabular => "tabular",
            InputFormat::Hierarchical => "hierarchical",
            InputFormat::Alto => "alto",
        }
    }

    /// Name of the OCR engine producing this format
    pub fn engine_name(&self) -> &'static str {
        match self {
            InputFormat::Tabular => "Tesseract",
            InputFormat::Hierarchical => "ABBYY",
            InputFormat::Alto => "Transkribus",
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for InputFormat {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tabular" | "tesseract" => Ok(InputFormat::Tabular),
            "hierarchical" | "abbyy" => Ok(InputFormat::Hierarchical),
            "alto" | "transkribus" => Ok(InputFormat::Alto),
            _ => Err(ConvertError::NoSuchConverter(s.to_string())),
        }
    }
}

/// Depth of an element in Tesseract's page hierarchy
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Page = 1,
    #[default]
    Block = 2,
    Paragraph = 3,
    Line = 4,
    Word = 5,
}

impl Level {
    pub const ALL: [Level; 5] = [
        Level::Page,
        Level::Block,
        Level::Paragraph,
        Level::Line,
        Level::Word,
    ];

    /// Ordinal used in Tesseract's `level` column
    pub fn ordinal(self) -> i64 {
        self as i64
    }

    /// Name of the column carrying this level's numbering
    pub fn column(self) -> &'static str {
        match self {
            Level::Page => "page_num",
            Level::Block => "block_num",
            Level::Paragraph => "par_num",
            Level::Line => "line_num",
            Level::Word => "word_num",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Level::Page => "page",
            Level::Block => "block",
            Level::Paragraph => "paragraph",
            Level::Line => "line",
            Level::Word => "word",
        }
    }

    /// This level and every level above it, outermost first
    pub fn path(self) -> impl Iterator<Item = Level> {
        Level::ALL.into_iter().filter(move |level| *level <= self)
    }
}

impl TryFrom<i64> for Level {
    type Error = ConvertError;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            1 => Ok(Level::Page),
            2 => Ok(Level::Block),
            3 => Ok(Level::Paragraph),
            4 => Ok(Level::Line),
            5 => Ok(Level::Word),
            other => Err(ConvertError::InvalidLevel(other)),
        }
    }
}

impl FromStr for Level {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if let Ok(ordinal) = trimmed.parse::<i64>() {
            return Level::try_from(ordinal);
        }
        Level::ALL
            .into_iter()
            .find(|level| trimmed == level.name() || trimmed == level.column())
            .ok_or_else(|| ConvertError::PerLevelIncorrect(s.to_string()))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_format_tags() {
        assert_eq!("tabular".parse::<InputFormat>().unwrap(), InputFormat::Tabular);
        assert_eq!("Tesseract".parse::<InputFormat>().unwrap(), InputFormat::Tabular);
        assert_eq!("abbyy".parse::<InputFormat>().unwrap(), InputFormat::Hierarchical);
        assert_eq!("transkribus".parse::<InputFormat>().unwrap(), InputFormat::Alto);
        assert_eq!("ALTO".parse::<InputFormat>().unwrap(), InputFormat::Alto);
    }

    #[test]
    fn test_unknown_format() {
        match "unknown".parse::<InputFormat>() {
            Err(ConvertError::NoSuchConverter(tag)) => assert_eq!(tag, "unknown"),
            other => panic!("expected NoSuchConverter, got {other:?}"),
        }
    }

    #[test]
    fn test_input_format_serde_aliases() {
        let format: InputFormat = serde_json::from_str("\"abbyy\"").unwrap();
        assert_eq!(format, InputFormat::Hierarchical);
        assert_eq!(serde_json::to_string(&InputFormat::Alto).unwrap(), "\"alto\"");
    }

    #[test]
    fn test_levels() {
        assert_eq!(Level::Page.ordinal(), 1);
        assert_eq!(Level::Block.ordinal(), 2);
        assert_eq!(Level::Paragraph.ordinal(), 3);
        assert_eq!(Level::Line.ordinal(), 4);
        assert_eq!(Level::Word.ordinal(), 5);
        assert!(Level::Page < Level::Word);
        assert_eq!(Level::default(), Level::Block);
    }

    #[test]
    fn test_level_columns() {
        let columns: Vec<&str> = Level::ALL.iter().map(|level| level.column()).collect();
        assert_eq!(
            columns,
            vec!["page_num", "block_num", "par_num", "line_num", "word_num"]
        );
    }

    #[test]
    fn test_level_path() {
        let path: Vec<Level> = Level::Paragraph.path().collect();
        assert_eq!(path, vec![Level::Page, Level::Block, Level::Paragraph]);
        assert_eq!(Level::Page.path().count(), 1);
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!(Level::try_from(5).unwrap(), Level::Word);
        assert!(matches!(Level::try_from(0), Err(ConvertError::InvalidLevel(0))));
        assert_eq!("line".parse::<Level>().unwrap(), Level::Line);
        assert_eq!("par_num".parse::<Level>().unwrap(), Level::Paragraph);
        assert_eq!("3".parse::<Level>().unwrap(), Level::Paragraph);
        assert!(matches!(
            "chapter".parse::<Level>(),
            Err(ConvertError::PerLevelIncorrect(_))
        ));
    }
}
