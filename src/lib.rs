//! Classify JSON-Schema fragments into structural categories and rewrite
//! them through per-category hook tables.
//!
//! ```
//! use schema_mapper::mapper::Mapper;
//! use serde_json::json;
//!
//! let out = Mapper::identity()
//!     .rewrite_value(&json!({"type": ["string", "integer"]}))
//!     .unwrap();
//! assert_eq!(out, json!({"oneOf": [{"type": "string"}, {"type": "integer"}]}));
//! ```
pub mod catalog;
pub mod category;
pub mod classify;
pub mod cli;
pub mod dbml;
pub mod error;
pub mod jq_exec;
pub mod mapper;
pub mod node;
pub mod path_de;
pub mod strategy;

pub use category::Category;
pub use classify::{classify, classify_value};
pub use error::{CatalogError, MapperError};
pub use mapper::{Mapper, Pipeline, Strategy};
pub use node::SchemaNode;
