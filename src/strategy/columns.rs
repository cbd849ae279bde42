//! Scalar-columns strategy.
//!
//! Keeps only properties that can act as table columns: anything whose
//! declared `type` names `object` or `array` (alone or inside a type list)
//! is dropped before the remaining properties are rewritten.
use serde_json::Value;

use crate::category::Category;
use crate::error::MapperResult;
use crate::mapper::{Mapper, Strategy};
use crate::node::{self, SchemaNode};
use crate::strategy::identity;

pub fn strategy() -> Strategy {
    Strategy {
        object_with_properties,
        ..Strategy::identity()
    }
}

/// True when the property's `type` mentions a container type.
pub fn is_container(property: &Value) -> bool {
    let names: Vec<&str> = match property.get(node::TYPE) {
        Some(Value::String(s)) => vec![s.as_str()],
        Some(Value::Array(xs)) => xs.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    };
    names.iter().any(|n| matches!(*n, "object" | "array"))
}

fn object_with_properties(mapper: &Mapper, node: &SchemaNode) -> MapperResult<SchemaNode> {
    let parent = Category::ObjectWithProperties;
    let props = identity::expect_object(parent, node.get(node::PROPERTIES))?;
    let mut out_props = SchemaNode::new();
    for (name, value) in props.iter().filter(|(_, v)| !is_container(v)) {
        out_props.insert(name.clone(), Value::Object(mapper.rewrite_child(parent, value)?));
    }
    Ok(identity::object_shell(out_props))
}
