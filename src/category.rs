// Closed set of structural shapes a schema node can take.
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Null,
    ObjectWithProperties,
    ObjectWithoutProperties,
    ArrayWithItemList,          // `items` is a sequence of schemas
    ArrayWithSingleItemSchema,  // `items` is one schema
    ArrayWithoutItems,
    Date,
    TimeWithZone,
    TimeWithoutZone,
    DateTimeWithZone,
    DateTimeWithoutZone,
    String,
    BinaryData,
    Boolean,
    Integer,
    Number,
    CombinedTypeList,           // `type` is a list of primitive names
    Union,                      // `oneOf` present
}

impl Category {
    pub const ALL: [Category; 18] = [
        Category::Null,
        Category::ObjectWithProperties,
        Category::ObjectWithoutProperties,
        Category::ArrayWithItemList,
        Category::ArrayWithSingleItemSchema,
        Category::ArrayWithoutItems,
        Category::Date,
        Category::TimeWithZone,
        Category::TimeWithoutZone,
        Category::DateTimeWithZone,
        Category::DateTimeWithoutZone,
        Category::String,
        Category::BinaryData,
        Category::Boolean,
        Category::Integer,
        Category::Number,
        Category::CombinedTypeList,
        Category::Union,
    ];

    /// Leaf categories carry no nested schema nodes.
    pub fn is_leaf(self) -> bool {
        !matches!(
            self,
            Category::ObjectWithProperties
                | Category::ArrayWithItemList
                | Category::ArrayWithSingleItemSchema
                | Category::CombinedTypeList
                | Category::Union
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Null => "null",
            Category::ObjectWithProperties => "object_with_properties",
            Category::ObjectWithoutProperties => "object_without_properties",
            Category::ArrayWithItemList => "array_with_item_list",
            Category::ArrayWithSingleItemSchema => "array_with_single_item_schema",
            Category::ArrayWithoutItems => "array_without_items",
            Category::Date => "date",
            Category::TimeWithZone => "time_with_zone",
            Category::TimeWithoutZone => "time_without_zone",
            Category::DateTimeWithZone => "date_time_with_zone",
            Category::DateTimeWithoutZone => "date_time_without_zone",
            Category::String => "string",
            Category::BinaryData => "binary_data",
            Category::Boolean => "boolean",
            Category::Integer => "integer",
            Category::Number => "number",
            Category::CombinedTypeList => "combined_type_list",
            Category::Union => "union",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn all_tags_are_distinct() {
        let set: BTreeSet<_> = Category::ALL.iter().copied().collect();
        assert_eq!(set.len(), Category::ALL.len());
        let names: BTreeSet<_> = Category::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(names.len(), Category::ALL.len());
    }

    #[test]
    fn exactly_five_composite_categories() {
        let composite = Category::ALL.iter().filter(|c| !c.is_leaf()).count();
        assert_eq!(composite, 5);
    }
}
