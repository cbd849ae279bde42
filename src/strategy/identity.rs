//! Identity-preserving hooks.
//!
//! Leaves are copied as-is. Composites are rebuilt with the same shape, each
//! nested schema going back through the mapper. Other strategies reuse these
//! hooks for the categories they do not customize.
use serde_json::Value;

use crate::category::Category;
use crate::error::{MapperError, MapperResult};
use crate::mapper::Mapper;
use crate::node::{self, SchemaNode};

pub fn passthrough(_: &Mapper, node: &SchemaNode) -> MapperResult<SchemaNode> {
    Ok(node::structural_clone(node))
}

pub fn object_with_properties(mapper: &Mapper, node: &SchemaNode) -> MapperResult<SchemaNode> {
    let parent = Category::ObjectWithProperties;
    let props = expect_object(parent, node.get(node::PROPERTIES))?;
    let mut out_props = SchemaNode::new();
    for (name, value) in props {
        out_props.insert(name.clone(), Value::Object(mapper.rewrite_child(parent, value)?));
    }
    Ok(object_shell(out_props))
}

pub fn array_with_item_list(mapper: &Mapper, node: &SchemaNode) -> MapperResult<SchemaNode> {
    let parent = Category::ArrayWithItemList;
    let items = expect_array(parent, node.get(node::ITEMS))?;
    let items = items
        .iter()
        .map(|item| mapper.rewrite_child(parent, item).map(Value::Object))
        .collect::<MapperResult<Vec<_>>>()?;
    Ok(array_shell(Value::Array(items)))
}

pub fn array_with_single_item_schema(mapper: &Mapper, node: &SchemaNode) -> MapperResult<SchemaNode> {
    let parent = Category::ArrayWithSingleItemSchema;
    let item = match node.get(node::ITEMS) {
        Some(item) => mapper.rewrite_child(parent, item)?,
        None => return Err(MapperError::MalformedNestedNode { parent, value: Value::Null }),
    };
    Ok(array_shell(Value::Object(item)))
}

/// Best-effort union over the listed names. Each name becomes a synthetic
/// `{"type": name}` node rewritten through the mapper, so leaf hooks apply.
/// Any other keys of the original node (including `properties`) are not
/// carried into the alternatives.
pub fn combined_type_list(mapper: &Mapper, node: &SchemaNode) -> MapperResult<SchemaNode> {
    let parent = Category::CombinedTypeList;
    let names = expect_array(parent, node.get(node::TYPE))?;
    let names = names
        .iter()
        .map(|name| match name {
            Value::String(s) => Ok(s.as_str()),
            other => Err(MapperError::MalformedNestedNode { parent, value: other.clone() }),
        })
        .collect::<MapperResult<Vec<_>>>()?;
    union_of_names(mapper, &names)
}

pub fn union(mapper: &Mapper, node: &SchemaNode) -> MapperResult<SchemaNode> {
    let parent = Category::Union;
    let alternatives = expect_array(parent, node.get(node::ONE_OF))?;
    let alternatives = alternatives
        .iter()
        .map(|alt| mapper.rewrite_child(parent, alt).map(Value::Object))
        .collect::<MapperResult<Vec<_>>>()?;
    Ok(one_of_shell(alternatives))
}

// ————————————————————————————————————————————————————————————————————————————
// SHARED BUILDERS
// ————————————————————————————————————————————————————————————————————————————

pub fn union_of_names(mapper: &Mapper, names: &[&str]) -> MapperResult<SchemaNode> {
    let alternatives = names
        .iter()
        .map(|name| mapper.rewrite(&node::single_type(name)).map(Value::Object))
        .collect::<MapperResult<Vec<_>>>()?;
    Ok(one_of_shell(alternatives))
}

pub fn object_shell(properties: SchemaNode) -> SchemaNode {
    let mut out = node::single_type("object");
    out.insert(node::PROPERTIES.into(), Value::Object(properties));
    out
}

pub fn array_shell(items: Value) -> SchemaNode {
    let mut out = node::single_type("array");
    out.insert(node::ITEMS.into(), items);
    out
}

pub fn one_of_shell(alternatives: Vec<Value>) -> SchemaNode {
    let mut out = SchemaNode::new();
    out.insert(node::ONE_OF.into(), Value::Array(alternatives));
    out
}

pub(crate) fn expect_object(parent: Category, value: Option<&Value>) -> MapperResult<&SchemaNode> {
    match value {
        Some(Value::Object(map)) => Ok(map),
        other => Err(MapperError::MalformedNestedNode {
            parent,
            value: other.cloned().unwrap_or(Value::Null),
        }),
    }
}

pub(crate) fn expect_array(parent: Category, value: Option<&Value>) -> MapperResult<&Vec<Value>> {
    match value {
        Some(Value::Array(xs)) => Ok(xs),
        other => Err(MapperError::MalformedNestedNode {
            parent,
            value: other.cloned().unwrap_or(Value::Null),
        }),
    }
}
