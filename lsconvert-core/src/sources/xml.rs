//! XML read as a nested mapping
//!
//! The layout follows the common "XML as dict" convention:
//!
//! - the root element is the single key of the top-level mapping
//! - attributes are stored under `@name`
//! - a child element appearing once is a value, repeated it becomes a list
//! - an element with only text is that text, an empty element is `null`
//! - text next to child elements or attributes is stored under `#text`
//!
//! Namespaces are dropped: elements and attributes use their local names.

use crate::error::{ConvertError, Result};
use roxmltree::{Document, Node};
use serde_json::{Map, Value};

pub const TEXT_KEY: &str = "#text";

pub fn xml_to_value(text: &str) -> Result<Value> {
    let document =
        Document::parse(text).map_err(|e| ConvertError::malformed(format!("invalid XML: {e}")))?;
    let root = document.root_element();

    let mut map = Map::new();
    map.insert(root.tag_name().name().to_string(), element_value(root));
    Ok(Value::Object(map))
}

fn element_value(node: Node<'_, '_>) -> Value {
    let mut map = Map::new();
    for attribute in node.attributes() {
        map.insert(
            format!("@{}", attribute.name()),
            Value::String(attribute.value().to_string()),
        );
    }

    let mut text = String::new();
    for child in node.children() {
        if child.is_element() {
            let name = child.tag_name().name().to_string();
            let value = element_value(child);
            match map.get_mut(&name) {
                Some(Value::Array(items)) => items.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
                None => {
                    map.insert(name, value);
                }
            }
        } else if child.is_text() {
            text.push_str(child.text().unwrap_or_default());
        }
    }

    let text = text.trim();
    if map.is_empty() {
        if text.is_empty() {
            Value::Null
        } else {
            Value::String(text.to_string())
        }
    } else {
        if !text.is_empty() {
            map.insert(TEXT_KEY.to_string(), Value::String(text.to_string()));
        }
        Value::Object(map)
    }
}
