//! Category-dispatching rewrite engine.
//!
//! A [`Strategy`] is a table with one hook per [`Category`]. [`Mapper::rewrite`]
//! classifies a node, looks up the hook and calls it. Hooks recurse into
//! children through [`Mapper::rewrite_child`], never by walking the tree
//! themselves, so traversal stays in one place.
use serde_json::Value;
use tracing::trace;

use crate::category::Category;
use crate::classify::classify;
use crate::error::{MapperError, MapperResult};
use crate::node::SchemaNode;
use crate::strategy::identity;

pub type Hook = fn(&Mapper, &SchemaNode) -> MapperResult<SchemaNode>;

/// One rewrite hook per category.
///
/// Derive a custom table from an existing one with struct update syntax:
///
/// ```
/// use schema_mapper::mapper::{Mapper, Strategy};
/// use schema_mapper::node::single_type;
///
/// let strategy = Strategy {
///     date: |_, _| Ok(single_type("string")),
///     ..Strategy::identity()
/// };
/// let mapper = Mapper::new(strategy);
/// let node = serde_json::json!({"type": "string", "format": "date"});
/// let out = mapper.rewrite_value(&node).unwrap();
/// assert_eq!(out, serde_json::json!({"type": "string"}));
/// ```
#[derive(Clone, Copy)]
pub struct Strategy {
    pub null: Hook,
    pub object_with_properties: Hook,
    pub object_without_properties: Hook,
    pub array_with_item_list: Hook,
    pub array_with_single_item_schema: Hook,
    pub array_without_items: Hook,
    pub date: Hook,
    pub time_with_zone: Hook,
    pub time_without_zone: Hook,
    pub date_time_with_zone: Hook,
    pub date_time_without_zone: Hook,
    pub string: Hook,
    pub binary_data: Hook,
    pub boolean: Hook,
    pub integer: Hook,
    pub number: Hook,
    pub combined_type_list: Hook,
    pub union: Hook,
}

impl Strategy {
    /// The identity-preserving default table.
    pub fn identity() -> Self {
        Self {
            null: identity::passthrough,
            object_with_properties: identity::object_with_properties,
            object_without_properties: identity::passthrough,
            array_with_item_list: identity::array_with_item_list,
            array_with_single_item_schema: identity::array_with_single_item_schema,
            array_without_items: identity::passthrough,
            date: identity::passthrough,
            time_with_zone: identity::passthrough,
            time_without_zone: identity::passthrough,
            date_time_with_zone: identity::passthrough,
            date_time_without_zone: identity::passthrough,
            string: identity::passthrough,
            binary_data: identity::passthrough,
            boolean: identity::passthrough,
            integer: identity::passthrough,
            number: identity::passthrough,
            combined_type_list: identity::combined_type_list,
            union: identity::union,
        }
    }

    pub fn hook(&self, category: Category) -> Hook {
        match category {
            Category::Null => self.null,
            Category::ObjectWithProperties => self.object_with_properties,
            Category::ObjectWithoutProperties => self.object_without_properties,
            Category::ArrayWithItemList => self.array_with_item_list,
            Category::ArrayWithSingleItemSchema => self.array_with_single_item_schema,
            Category::ArrayWithoutItems => self.array_without_items,
            Category::Date => self.date,
            Category::TimeWithZone => self.time_with_zone,
            Category::TimeWithoutZone => self.time_without_zone,
            Category::DateTimeWithZone => self.date_time_with_zone,
            Category::DateTimeWithoutZone => self.date_time_without_zone,
            Category::String => self.string,
            Category::BinaryData => self.binary_data,
            Category::Boolean => self.boolean,
            Category::Integer => self.integer,
            Category::Number => self.number,
            Category::CombinedTypeList => self.combined_type_list,
            Category::Union => self.union,
        }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::fmt::Debug for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Strategy").finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Mapper {
    strategy: Strategy,
}

impl Mapper {
    pub fn new(strategy: Strategy) -> Self {
        Self { strategy }
    }

    pub fn identity() -> Self {
        Self::new(Strategy::identity())
    }

    /// Classify `node` and hand it to the matching hook.
    pub fn rewrite(&self, node: &SchemaNode) -> MapperResult<SchemaNode> {
        let category = classify(node)?;
        trace!(%category, "rewrite");
        (self.strategy.hook(category))(self, node)
    }

    /// Entry point for untyped documents; the root must be an object.
    pub fn rewrite_value(&self, value: &Value) -> MapperResult<Value> {
        match value {
            Value::Object(node) => self.rewrite(node).map(Value::Object),
            other => Err(MapperError::UnrecognizedShape { node: other.clone() }),
        }
    }

    /// Recurse into a nested value found under a `parent` node.
    pub fn rewrite_child(&self, parent: Category, value: &Value) -> MapperResult<SchemaNode> {
        match value {
            Value::Object(node) => self.rewrite(node),
            other => Err(MapperError::MalformedNestedNode { parent, value: other.clone() }),
        }
    }
}

/// Mappers applied one after another; each output is re-classified by the next.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    stages: Vec<Mapper>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, mapper: Mapper) -> Self {
        self.stages.push(mapper);
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// An empty pipeline returns an independent copy of the input.
    pub fn rewrite(&self, node: &SchemaNode) -> MapperResult<SchemaNode> {
        let mut current = crate::node::structural_clone(node);
        for stage in &self.stages {
            current = stage.rewrite(&current)?;
        }
        Ok(current)
    }

    pub fn rewrite_value(&self, value: &Value) -> MapperResult<Value> {
        match value {
            Value::Object(node) => self.rewrite(node).map(Value::Object),
            other => Err(MapperError::UnrecognizedShape { node: other.clone() }),
        }
    }
}

impl FromIterator<Mapper> for Pipeline {
    fn from_iter<I: IntoIterator<Item = Mapper>>(iter: I) -> Self {
        Self { stages: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::single_type;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn mapper_is_thread_safe() {
        assert_send_sync::<Mapper>();
        assert_send_sync::<Pipeline>();
    }

    #[test]
    fn hook_table_dispatches_every_category() {
        // a table where each hook tags its output with the category it was bound to
        macro_rules! tag {
            ($name:literal) => {
                |_: &Mapper, _: &SchemaNode| Ok(single_type($name))
            };
        }
        let strategy = Strategy {
            null: tag!("null"),
            object_with_properties: tag!("object_with_properties"),
            object_without_properties: tag!("object_without_properties"),
            array_with_item_list: tag!("array_with_item_list"),
            array_with_single_item_schema: tag!("array_with_single_item_schema"),
            array_without_items: tag!("array_without_items"),
            date: tag!("date"),
            time_with_zone: tag!("time_with_zone"),
            time_without_zone: tag!("time_without_zone"),
            date_time_with_zone: tag!("date_time_with_zone"),
            date_time_without_zone: tag!("date_time_without_zone"),
            string: tag!("string"),
            binary_data: tag!("binary_data"),
            boolean: tag!("boolean"),
            integer: tag!("integer"),
            number: tag!("number"),
            combined_type_list: tag!("combined_type_list"),
            union: tag!("union"),
        };
        for category in Category::ALL {
            let out = (strategy.hook(category))(&Mapper::identity(), &SchemaNode::new()).unwrap();
            assert_eq!(out.get("type"), Some(&json!(category.as_str())));
        }
    }

    #[test]
    fn overriding_one_hook_applies_in_nested_positions() {
        let mapper = Mapper::new(Strategy {
            integer: |_, _| Ok(single_type("number")),
            ..Strategy::identity()
        });
        let input = json!({
            "type": "object",
            "properties": {
                "id": {"type": "integer"},
                "tags": {"type": "array", "items": {"type": "integer"}}
            }
        });
        let out = mapper.rewrite_value(&input).unwrap();
        assert_eq!(out, json!({
            "type": "object",
            "properties": {
                "id": {"type": "number"},
                "tags": {"type": "array", "items": {"type": "number"}}
            }
        }));
    }

    #[test]
    fn rewrite_child_rejects_non_objects() {
        let err = Mapper::identity()
            .rewrite_child(Category::Union, &json!(42))
            .unwrap_err();
        assert_eq!(err, MapperError::MalformedNestedNode { parent: Category::Union, value: json!(42) });
    }

    #[test]
    fn non_object_root_is_unrecognized() {
        let err = Mapper::identity().rewrite_value(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, MapperError::UnrecognizedShape { .. }));
    }

    #[test]
    fn pipeline_chains_stages() {
        let to_string = Mapper::new(Strategy {
            integer: |_, _| Ok(single_type("string")),
            ..Strategy::identity()
        });
        let pipeline = Pipeline::new().then(Mapper::identity()).then(to_string);
        let out = pipeline.rewrite_value(&json!({"type": ["integer", "null"]})).unwrap();
        assert_eq!(out, json!({"oneOf": [{"type": "string"}, {"type": "null"}]}));
        assert_eq!(pipeline.len(), 2);
    }

    #[test]
    fn empty_pipeline_copies_input() {
        let input = json!({"type": "object", "description": "kept"});
        assert_eq!(Pipeline::new().rewrite_value(&input).unwrap(), input);
    }
}
