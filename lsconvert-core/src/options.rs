//! Conversion options
//!
//! Options arrive either from code (builder methods) or from loosely typed
//! sources such as a batch manifest. The target level is kept as a raw value
//! so that the tabular converter, the only one using it, can report a
//! malformed level itself.

use crate::error::{ConvertError, Result};
use crate::format::Level;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Tesseract level whose rows become regions (ordinal, defaults to block)
    #[serde(
        alias = "per_level",
        alias = "targetLevel",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_level: Option<Value>,
}

impl ConvertOptions {
    /// Read options from a keyword mapping (`{"per_level": 5}`)
    pub fn from_map(map: &Map<String, Value>) -> Result<Self> {
        serde_json::from_value(Value::Object(map.clone()))
            .map_err(|e| ConvertError::InvalidOptions(e.to_string()))
    }

    /// Set the target level
    pub fn with_target_level(mut self, level: Level) -> Self {
        self.target_level = Some(Value::from(level.ordinal()));
        self
    }

    /// Set the target level from an unchecked value
    pub fn with_raw_target_level(mut self, level: Value) -> Self {
        self.target_level = Some(level);
        self
    }

    /// Resolve the target level, [`Level::Block`] when unset
    pub fn resolve_target_level(&self) -> Result<Level> {
        match &self.target_level {
            None | Some(Value::Null) => Ok(Level::default()),
            Some(Value::Number(number)) => match number.as_i64() {
                Some(ordinal) => Level::try_from(ordinal),
                None => Err(ConvertError::PerLevelIncorrect(number.to_string())),
            },
            Some(other) => Err(ConvertError::PerLevelIncorrect(other.to_string())),
        }
    }
}
