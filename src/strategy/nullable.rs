//! Collapses nullable type lists.
//!
//! Catalogs flag nearly every column as nullable, so `["null", "string"]`
//! carries little more than `"string"`. A list that is a single type plus
//! `"null"` keeps every other key of the node (`format`, `properties`, ...)
//! and is rewritten again with that single type; longer lists keep the
//! union translation over their non-null names.
use serde_json::Value;

use crate::category::Category;
use crate::error::{MapperError, MapperResult};
use crate::mapper::{Mapper, Strategy};
use crate::node::{self, SchemaNode};
use crate::strategy::identity;

pub fn strategy() -> Strategy {
    Strategy {
        combined_type_list,
        ..Strategy::identity()
    }
}

pub fn combined_type_list(mapper: &Mapper, node: &SchemaNode) -> MapperResult<SchemaNode> {
    let parent = Category::CombinedTypeList;
    let names = identity::expect_array(parent, node.get(node::TYPE))?;
    let mut kept = Vec::with_capacity(names.len());
    for name in names {
        match name.as_str() {
            Some("null") => {}
            Some(s) => kept.push(s),
            None => return Err(MapperError::MalformedNestedNode { parent, value: name.clone() }),
        }
    }
    match kept.as_slice() {
        [single] => {
            let mut collapsed = node::structural_clone(node);
            collapsed.insert(node::TYPE.into(), Value::from(*single));
            mapper.rewrite(&collapsed)
        }
        _ => identity::union_of_names(mapper, &kept),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn rewrite(v: Value) -> MapperResult<Value> {
        Mapper::new(strategy()).rewrite_value(&v)
    }

    #[test]
    fn nullable_single_type_collapses() {
        assert_eq!(rewrite(json!({"type": ["null", "integer"]})).unwrap(), json!({"type": "integer"}));
    }

    #[test]
    fn collapse_applies_below_objects() {
        let v = json!({
            "type": "object",
            "properties": {"id": {"type": ["string", "null"]}}
        });
        assert_eq!(
            rewrite(v).unwrap(),
            json!({"type": "object", "properties": {"id": {"type": "string"}}})
        );
    }

    #[test]
    fn collapse_keeps_format_markers() {
        let v = json!({
            "type": ["null", "string"],
            "format": "date-time",
            "airbyte_type": "timestamp_without_timezone"
        });
        let out = rewrite(v).unwrap();
        assert_eq!(out, json!({
            "type": "string",
            "format": "date-time",
            "airbyte_type": "timestamp_without_timezone"
        }));
        assert_eq!(crate::classify::classify_value(&out), Ok(Category::DateTimeWithoutZone));
    }

    #[test]
    fn collapse_keeps_nested_object_schema() {
        let v = json!({
            "type": ["null", "object"],
            "properties": {"a": {"type": ["string", "null"]}}
        });
        assert_eq!(
            rewrite(v).unwrap(),
            json!({"type": "object", "properties": {"a": {"type": "string"}}})
        );
    }

    #[test]
    fn wider_lists_stay_unions_without_null() {
        let out = rewrite(json!({"type": ["null", "string", "number"]})).unwrap();
        assert_eq!(out, json!({"oneOf": [{"type": "string"}, {"type": "number"}]}));
    }

    #[test]
    fn only_null_yields_empty_union() {
        assert_eq!(rewrite(json!({"type": ["null"]})).unwrap(), json!({"oneOf": []}));
    }

    #[test]
    fn explicit_null_node_is_untouched() {
        assert_eq!(rewrite(json!({"type": "null"})).unwrap(), json!({"type": "null"}));
    }
}
