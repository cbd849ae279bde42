//! Error types for classification and rewriting.
use serde_json::Value;
use thiserror::Error;

use crate::category::Category;

/// Terminal errors raised while classifying or rewriting a schema tree.
///
/// Both kinds are input-contract violations: the engine never retries and
/// never falls back to a default category.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapperError {
    /// No category predicate matched the node.
    #[error("unrecognized schema shape: {node}")]
    UnrecognizedShape { node: Value },

    /// A hook expected a nested schema node and found something else.
    #[error("malformed nested node under {parent}: {value}")]
    MalformedNestedNode { parent: Category, value: Value },
}

pub type MapperResult<T> = Result<T, MapperError>;

/// Errors raised while loading a catalog or rendering it as DBML.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog JSON did not match the expected layout.
    #[error("invalid catalog: {0}")]
    Parse(String),

    #[error("stream `{stream}`: {source}")]
    Rewrite {
        stream: String,
        #[source]
        source: MapperError,
    },

    /// `json_schema` of a stream is not an object with properties.
    #[error("stream `{0}` has no top-level properties")]
    MissingProperties(String),

    #[error("column `{column}` has unsupported type {ty}")]
    UnsupportedColumnType { column: String, ty: Value },

    #[error("expected exactly one type apart from `null` for column `{column}`, got {ty}")]
    AmbiguousColumnType { column: String, ty: Value },

    #[error("stream `{stream}`: nested key in primary key {key:?} is not supported")]
    NestedPrimaryKey { stream: String, key: Vec<Vec<String>> },

    #[error("stream `{stream}`: primary key column `{column}` is missing from the table")]
    MissingPrimaryKeyColumn { stream: String, column: String },

    #[error("could not find table `{0}`")]
    UnknownTable(String),

    #[error("could not find column `{column}` in table `{table}`")]
    UnknownColumn { table: String, column: String },

    /// Relation targets must be `table.column`; nested fields are not supported.
    #[error("stream `{stream}`: relation `{column}` → `{target}` is not of the form table.column")]
    NestedRelationTarget { stream: String, column: String, target: String },
}

pub type CatalogResult<T> = Result<T, CatalogError>;
