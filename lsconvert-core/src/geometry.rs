//! Pixel rectangles and their percentage-of-image form
//!
//! Label Studio places regions relative to the image, so every converter
//! turns the absolute pixel boxes reported by the OCR engine into
//! percentages of the image width and height. Values are not clamped: a box
//! that extends past the reported image size yields values above 100.

use crate::error::{ConvertError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Width and height of the source image in pixels, both strictly positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageDimensions {
    width: u32,
    height: u32,
}

impl ImageDimensions {
    /// Create image dimensions, rejecting a zero side
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ConvertError::IncorrectImageFormat(format!(
                "image dimensions must be positive, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Build dimensions from loosely typed values, e.g. a `{"width", "height"}` object
    pub fn from_values(width: &Value, height: &Value) -> Result<Self> {
        let width = coerce_int("image_width", width)?;
        let height = coerce_int("image_height", height)?;
        let to_side = |side: i64| {
            u32::try_from(side).map_err(|_| {
                ConvertError::IncorrectImageFormat(format!(
                    "image dimensions must be positive, got {width}x{height}"
                ))
            })
        };
        Self::new(to_side(width)?, to_side(height)?)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// An axis-aligned rectangle in image pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
    /// Rotation in degrees, carried through unchanged
    pub rotation: i64,
}

impl PixelRect {
    /// Create a rectangle from its top-left corner and size
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rotation: 0,
        }
    }

    /// Create a rectangle from its four edges (`left, top, right, bottom`)
    ///
    /// Returns `None` when the width or height does not fit in an `i64`.
    pub fn from_edges(left: i64, top: i64, right: i64, bottom: i64) -> Option<Self> {
        Some(Self::new(
            left,
            top,
            right.checked_sub(left)?,
            bottom.checked_sub(top)?,
        ))
    }

    /// Set the rotation
    pub fn with_rotation(mut self, rotation: i64) -> Self {
        self.rotation = rotation;
        self
    }

    /// Express this rectangle as percentages of `image`
    pub fn normalize(&self, image: ImageDimensions) -> BoundingBox {
        let image_width = f64::from(image.width);
        let image_height = f64::from(image.height);

        BoundingBox {
            x: 100.0 * self.x as f64 / image_width,
            y: 100.0 * self.y as f64 / image_height,
            width: 100.0 * self.width as f64 / image_width,
            height: 100.0 * self.height as f64 / image_height,
            rotation: self.rotation,
        }
    }
}

/// A rectangle in percentage-of-image units, as Label Studio expects it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: i64,
}

/// Normalize a pixel rectangle against the image dimensions
pub fn normalize(rect: &PixelRect, image: ImageDimensions) -> BoundingBox {
    rect.normalize(image)
}

/// Coerce a loosely typed value into an integer
///
/// Accepts JSON integers, floats (truncated toward zero) and strings holding
/// an integer, surrounding whitespace allowed. Anything else fails with
/// [`ConvertError::NotAnInteger`] naming `field`.
pub fn coerce_int(field: &str, value: &Value) -> Result<i64> {
    let coerced = match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };

    coerced.ok_or_else(|| ConvertError::NotAnInteger {
        field: field.to_string(),
        value: value.to_string(),
    })
}
