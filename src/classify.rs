//! Shape classifier: one category per node, decided from the node's own keys.
//!
//! Predicates are checked in a fixed order and the first match wins, since
//! a node can carry several overlapping markers (e.g. both `type` and `oneOf`).
use serde_json::Value;

use crate::category::Category;
use crate::error::{MapperError, MapperResult};
use crate::node::{self, SchemaNode};

pub fn classify(node: &SchemaNode) -> MapperResult<Category> {
    match node.get(node::TYPE) {
        Some(Value::String(ty)) => {
            if let Some(category) = classify_named(ty, node) {
                return Ok(category);
            }
        }
        Some(Value::Array(names)) => {
            if names.iter().all(Value::is_string) {
                return Ok(Category::CombinedTypeList);
            }
        }
        _ => {}
    }
    if node.contains_key(node::ONE_OF) {
        return Ok(Category::Union);
    }
    Err(MapperError::UnrecognizedShape { node: Value::Object(node.clone()) })
}

/// Classify an untyped value; anything but an object is unrecognized.
pub fn classify_value(value: &Value) -> MapperResult<Category> {
    match value {
        Value::Object(node) => classify(node),
        other => Err(MapperError::UnrecognizedShape { node: other.clone() }),
    }
}

fn classify_named(ty: &str, node: &SchemaNode) -> Option<Category> {
    let category = match ty {
        "null" => Category::Null,
        "object" => match node.get(node::PROPERTIES) {
            None => Category::ObjectWithoutProperties,
            Some(Value::Object(props)) if props.is_empty() => Category::ObjectWithoutProperties,
            // non-mapping `properties` is rejected by the hook, not silently dropped here
            Some(_) => Category::ObjectWithProperties,
        },
        "array" => match node.get(node::ITEMS) {
            None => Category::ArrayWithoutItems,
            Some(Value::Array(_)) => Category::ArrayWithItemList,
            Some(_) => Category::ArrayWithSingleItemSchema,
        },
        "string" => classify_string(node),
        "boolean" => Category::Boolean,
        "integer" => Category::Integer,
        "number" => match marker(node, node::AIRBYTE_TYPE) {
            Some("integer") => Category::Integer,
            _ => Category::Number,
        },
        _ => return None,
    };
    Some(category)
}

fn classify_string(node: &SchemaNode) -> Category {
    if marker(node, node::CONTENT_ENCODING) == Some("base64") {
        return Category::BinaryData;
    }
    let airbyte_type = marker(node, node::AIRBYTE_TYPE);
    match marker(node, node::FORMAT) {
        Some("date") => Category::Date,
        Some("time") => match airbyte_type {
            Some("time_without_timezone") => Category::TimeWithoutZone,
            _ => Category::TimeWithZone,
        },
        Some("date-time") => match airbyte_type {
            Some("timestamp_without_timezone") => Category::DateTimeWithoutZone,
            _ => Category::DateTimeWithZone,
        },
        _ => Category::String,
    }
}

fn marker<'a>(node: &'a SchemaNode, key: &str) -> Option<&'a str> {
    node.get(key).and_then(Value::as_str)
}
