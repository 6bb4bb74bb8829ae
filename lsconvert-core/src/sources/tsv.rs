//! Tesseract TSV output read as parallel columns
//!
//! `tesseract image.png out tsv` writes one header row followed by one row
//! per element. The columns become the sequences the tabular converter
//! expects. Integer cells become numbers, `conf` becomes a number even when
//! fractional, and `text` is kept verbatim.

use crate::error::{ConvertError, Result};
use serde_json::{Map, Value};

pub fn tsv_to_value(text: &str) -> Result<Value> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());
    let header: Vec<&str> = lines
        .next()
        .ok_or_else(|| ConvertError::malformed("TSV input has no header row"))?
        .split('\t')
        .map(str::trim)
        .collect();

    if !header.contains(&"level") {
        return Err(ConvertError::malformed(
            "TSV header must name a `level` column",
        ));
    }

    let mut columns: Vec<Vec<Value>> = vec![Vec::new(); header.len()];
    for line in lines {
        let cells: Vec<&str> = line.split('\t').collect();
        for (index, name) in header.iter().enumerate() {
            let cell = cells.get(index).copied().unwrap_or("");
            columns[index].push(cell_value(name, cell));
        }
    }

    let table: Map<String, Value> = header
        .into_iter()
        .zip(columns)
        .map(|(name, values)| (name.to_string(), Value::Array(values)))
        .collect();
    Ok(Value::Object(table))
}

fn cell_value(column: &str, cell: &str) -> Value {
    if column == "text" {
        return Value::String(cell.to_string());
    }

    let trimmed = cell.trim();
    if let Ok(number) = trimmed.parse::<i64>() {
        return Value::from(number);
    }
    if column == "conf" {
        if let Ok(number) = trimmed.parse::<f64>() {
            if number.is_finite() {
                return Value::from(number);
            }
        }
    }
    Value::String(cell.to_string())
}
