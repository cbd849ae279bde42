//! Schema node representation and shared helpers.
//!
//! A node is an insertion-ordered JSON object (`serde_json` is built with
//! `preserve_order`), so property order survives every rewrite.
use serde_json::{Map, Value};

pub type SchemaNode = Map<String, Value>;

pub const TYPE: &str = "type";
pub const PROPERTIES: &str = "properties";
pub const ITEMS: &str = "items";
pub const ONE_OF: &str = "oneOf";
pub const FORMAT: &str = "format";
pub const AIRBYTE_TYPE: &str = "airbyte_type";
pub const CONTENT_ENCODING: &str = "contentEncoding";

/// Deep, independent copy of a node. Every identity passthrough goes through here.
pub fn structural_clone(node: &SchemaNode) -> SchemaNode {
    node.clone()
}

/// Minimal single-type node, e.g. `{"type": "string"}`.
pub fn single_type(name: &str) -> SchemaNode {
    let mut node = SchemaNode::new();
    node.insert(TYPE.into(), Value::from(name));
    node
}

/// Schema nesting depth. Leaves count as 1; composites add one level over
/// their deepest nested schema (`properties` values, `items`, `oneOf`).
pub fn depth(value: &Value) -> usize {
    let Some(node) = value.as_object() else {
        return 1;
    };
    let props = node
        .get(PROPERTIES)
        .and_then(Value::as_object)
        .into_iter()
        .flat_map(|m| m.values());
    let items: Box<dyn Iterator<Item = &Value> + '_> = match node.get(ITEMS) {
        Some(Value::Array(xs)) => Box::new(xs.iter()),
        Some(x @ Value::Object(_)) => Box::new(std::iter::once(x)),
        _ => Box::new(std::iter::empty()),
    };
    let alts = node
        .get(ONE_OF)
        .and_then(Value::as_array)
        .into_iter()
        .flatten();
    let children = props.chain(items).chain(alts).map(depth).max();
    match children {
        Some(d) => d + 1,
        None => 1,
    }
}
