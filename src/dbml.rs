//! Render catalog streams as DBML tables.
//!
//! Each stream schema is first reduced to scalar columns with a hook table
//! that combines the `columns` and `nullable` strategies, then every
//! surviving property is mapped to a column type from its category.
//! Relations between columns are rendered as many-to-many `Ref` lines.
use std::fmt::Write as _;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::catalog::{Catalog, Relations, Stream};
use crate::category::Category;
use crate::classify::classify_value;
use crate::error::{CatalogError, CatalogResult};
use crate::mapper::{Mapper, Strategy};
use crate::node;
use crate::strategy::{columns, nullable};

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    /// Column name → DBML type, in schema order.
    pub columns: IndexMap<String, String>,
    pub primary_key: Vec<String>,
}

/// `from_table.from_column <> to_table.to_column`
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub from_table: String,
    pub from_column: String,
    pub to_table: String,
    pub to_column: String,
}

/// Scalar columns with nullable type lists collapsed.
pub fn column_strategy() -> Strategy {
    Strategy {
        combined_type_list: nullable::combined_type_list,
        ..columns::strategy()
    }
}

/// DBML type for a rewritten property schema.
pub fn column_type(column: &str, property: &Value) -> CatalogResult<String> {
    let unsupported = || CatalogError::UnsupportedColumnType {
        column: column.to_string(),
        ty: property.clone(),
    };
    let category = classify_value(property).map_err(|_| unsupported())?;
    let ty = match category {
        Category::String => "string",
        Category::Integer => "integer",
        Category::Number => "number",
        Category::Boolean => "boolean",
        Category::Date => "date",
        Category::TimeWithZone => "time_with_timezone",
        Category::TimeWithoutZone => "time_without_timezone",
        Category::DateTimeWithZone => "timestamp_with_timezone",
        Category::DateTimeWithoutZone => "timestamp_without_timezone",
        Category::BinaryData => "binary",
        Category::CombinedTypeList | Category::Union => {
            return Err(CatalogError::AmbiguousColumnType {
                column: column.to_string(),
                ty: property.clone(),
            });
        }
        Category::Null
        | Category::ObjectWithProperties
        | Category::ObjectWithoutProperties
        | Category::ArrayWithItemList
        | Category::ArrayWithSingleItemSchema
        | Category::ArrayWithoutItems => return Err(unsupported()),
    };
    Ok(ty.to_string())
}

pub fn table_for_stream(mapper: &Mapper, stream: &Stream) -> CatalogResult<Table> {
    let rewritten = mapper
        .rewrite_value(&stream.json_schema)
        .map_err(|source| CatalogError::Rewrite { stream: stream.name.clone(), source })?;
    let props = rewritten
        .get(node::PROPERTIES)
        .and_then(Value::as_object)
        .ok_or_else(|| CatalogError::MissingProperties(stream.name.clone()))?;

    let mut columns = IndexMap::with_capacity(props.len());
    for (name, property) in props {
        columns.insert(name.clone(), column_type(name, property)?);
    }

    let primary_key = resolve_primary_key(stream, &columns)?;

    debug!(stream = %stream.name, columns = columns.len(), "built table");
    Ok(Table { name: stream.name.clone(), columns, primary_key })
}

/// A single key marks its column `[pk]` when it is a top-level column, and
/// nothing otherwise. Composite keys must be made of top-level columns.
fn resolve_primary_key(stream: &Stream, columns: &IndexMap<String, String>) -> CatalogResult<Vec<String>> {
    let keys = &stream.source_defined_primary_key;
    match keys.as_slice() {
        [] => Ok(Vec::new()),
        [key] => match key.as_slice() {
            [column] if columns.contains_key(column) => Ok(vec![column.clone()]),
            _ => {
                debug!(stream = %stream.name, ?key, "primary key is not a top-level column");
                Ok(Vec::new())
            }
        },
        _ => {
            if keys.iter().any(|key| key.len() != 1) {
                return Err(CatalogError::NestedPrimaryKey {
                    stream: stream.name.clone(),
                    key: keys.clone(),
                });
            }
            keys.iter()
                .flatten()
                .map(|column| {
                    if columns.contains_key(column) {
                        Ok(column.clone())
                    } else {
                        Err(CatalogError::MissingPrimaryKeyColumn {
                            stream: stream.name.clone(),
                            column: column.clone(),
                        })
                    }
                })
                .collect()
        }
    }
}

/// Resolve every relation against the built tables. Both ends must exist.
pub fn build_references(tables: &[Table], relations: &Relations) -> CatalogResult<Vec<Reference>> {
    let mut references = Vec::new();
    for stream in &relations.streams {
        for (column, target) in &stream.relations {
            let Some((to_table, to_column)) = target.split_once('.').filter(|(_, c)| !c.contains('.')) else {
                return Err(CatalogError::NestedRelationTarget {
                    stream: stream.name.clone(),
                    column: column.clone(),
                    target: target.clone(),
                });
            };
            resolve_column(tables, &stream.name, column)?;
            resolve_column(tables, to_table, to_column)?;
            references.push(Reference {
                from_table: stream.name.clone(),
                from_column: column.clone(),
                to_table: to_table.to_string(),
                to_column: to_column.to_string(),
            });
        }
    }
    Ok(references)
}

fn resolve_column(tables: &[Table], table: &str, column: &str) -> CatalogResult<()> {
    let found = tables
        .iter()
        .find(|t| t.name == table)
        .ok_or_else(|| CatalogError::UnknownTable(table.to_string()))?;
    if !found.columns.contains_key(column) {
        return Err(CatalogError::UnknownColumn {
            table: table.to_string(),
            column: column.to_string(),
        });
    }
    Ok(())
}

/// Double-quoted DBML identifier.
fn quoted(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}

pub fn render_table(table: &Table) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Table {} {{", quoted(&table.name));
    let single_pk = match table.primary_key.as_slice() {
        [pk] => Some(pk.as_str()),
        _ => None,
    };
    for (name, ty) in &table.columns {
        let settings = if single_pk == Some(name.as_str()) { " [pk]" } else { "" };
        let _ = writeln!(out, "    {} {ty}{settings}", quoted(name));
    }
    if table.primary_key.len() > 1 {
        let subjects = table
            .primary_key
            .iter()
            .map(|c| quoted(c))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out);
        let _ = writeln!(out, "    indexes {{");
        let _ = writeln!(out, "        ({subjects}) [pk]");
        let _ = writeln!(out, "    }}");
    }
    out.push('}');
    out.push('\n');
    out
}

pub fn render_reference(reference: &Reference) -> String {
    format!(
        "Ref: {}.{} <> {}.{}",
        quoted(&reference.from_table),
        quoted(&reference.from_column),
        quoted(&reference.to_table),
        quoted(&reference.to_column),
    )
}

pub fn render_dbml(catalog: &Catalog, relations: Option<&Relations>) -> CatalogResult<String> {
    let mapper = Mapper::new(column_strategy());
    let tables = catalog
        .streams
        .iter()
        .map(|stream| table_for_stream(&mapper, stream))
        .collect::<CatalogResult<Vec<_>>>()?;
    let mut out = tables.iter().map(render_table).collect::<Vec<_>>().join("\n");
    if let Some(relations) = relations {
        let references = build_references(&tables, relations)?;
        debug!(references = references.len(), "resolved relations");
        if !references.is_empty() {
            out.push('\n');
        }
        for reference in &references {
            let _ = writeln!(out, "{}", render_reference(reference));
        }
    }
    Ok(out)
}
