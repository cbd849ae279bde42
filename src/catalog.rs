//! Connector catalog documents: a list of streams, each with a JSON schema,
//! plus the relations file that links stream columns across tables.
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::{CatalogError, CatalogResult};
use crate::path_de;

#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub streams: Vec<Stream>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Stream {
    pub name: String,
    pub json_schema: Value,
    /// Each key is a path into the record; top-level keys have length 1.
    #[serde(default)]
    pub source_defined_primary_key: Vec<Vec<String>>,
}

impl Catalog {
    pub fn from_json(src: &str) -> CatalogResult<Self> {
        path_de::from_str_with_path(src)
    }

    /// Pick the catalog out of line-delimited discover output, where it is
    /// wrapped as `{"type": "CATALOG", "catalog": {...}}`. Lines that are not
    /// JSON objects (log noise) are skipped.
    pub fn from_discover_output(output: &str) -> CatalogResult<Self> {
        for line in output.lines() {
            let Ok(Value::Object(mut message)) = serde_json::from_str::<Value>(line) else {
                continue;
            };
            if message.get("type").and_then(Value::as_str) != Some("CATALOG") {
                continue;
            }
            let catalog = message.remove("catalog").unwrap_or(Value::Null);
            return path_de::from_value_with_path(catalog);
        }
        Err(CatalogError::Parse("no catalog was found in output".into()))
    }

    pub fn stream(&self, name: &str) -> Option<&Stream> {
        self.streams.iter().find(|s| s.name == name)
    }
}

/// `{"streams": [{"name": "ads", "relations": {"account_id": "accounts.id"}}]}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Relations {
    pub streams: Vec<StreamRelations>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StreamRelations {
    pub name: String,
    /// Column → `table.column` it references.
    #[serde(default)]
    pub relations: IndexMap<String, String>,
}

impl Relations {
    pub fn from_json(src: &str) -> CatalogResult<Self> {
        path_de::from_str_with_path(src)
    }

    /// Drop relations whose target table is not a stream of `catalog`.
    /// Returns the dropped `(stream, column, target)` triples.
    pub fn prune(&mut self, catalog: &Catalog) -> Vec<(String, String, String)> {
        let mut dropped = Vec::new();
        for stream in &mut self.streams {
            stream.relations.retain(|column, target| {
                let table = target.split('.').next().unwrap_or_default();
                if catalog.stream(table).is_some() {
                    return true;
                }
                warn!(stream = %stream.name, %column, %target, "dropping relation to unknown stream");
                dropped.push((stream.name.clone(), column.clone(), target.clone()));
                false
            });
        }
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_streams_with_default_keys() {
        let src = r#"{"streams": [{"name": "ads", "json_schema": {"type": "object"}}]}"#;
        let catalog = Catalog::from_json(src).unwrap();
        assert_eq!(catalog.streams.len(), 1);
        assert!(catalog.stream("ads").unwrap().source_defined_primary_key.is_empty());
        assert!(catalog.stream("campaigns").is_none());
    }

    #[test]
    fn parse_errors_carry_the_path() {
        let src = r#"{"streams": [{"name": 5, "json_schema": {}}]}"#;
        let err = Catalog::from_json(src).unwrap_err().to_string();
        assert!(err.contains("streams[0].name"), "{err}");
    }

    #[test]
    fn discover_output_skips_other_messages() {
        let output = [
            r#"{"type": "LOG", "log": {"level": "INFO", "message": "starting"}}"#,
            "not json at all",
            r#"{"type": "CATALOG", "catalog": {"streams": [{"name": "users", "json_schema": {}, "source_defined_primary_key": [["id"]]}]}}"#,
        ]
        .join("\n");
        let catalog = Catalog::from_discover_output(&output).unwrap();
        assert_eq!(catalog.streams[0].source_defined_primary_key, vec![vec!["id".to_string()]]);
    }

    #[test]
    fn prune_drops_relations_to_unknown_streams() {
        let catalog = Catalog::from_json(
            r#"{"streams": [{"name": "ads", "json_schema": {}}, {"name": "accounts", "json_schema": {}}]}"#,
        )
        .unwrap();
        let mut relations = Relations::from_json(
            r#"{"streams": [{"name": "ads", "relations": {
                "account_id": "accounts.id",
                "campaign_id": "campaigns.id",
                "ad_set_id": "ad_sets.id"
            }}]}"#,
        )
        .unwrap();
        let dropped = relations.prune(&catalog);
        assert_eq!(dropped.len(), 2);
        assert_eq!(dropped[0], ("ads".to_string(), "campaign_id".to_string(), "campaigns.id".to_string()));
        let kept: Vec<_> = relations.streams[0].relations.keys().cloned().collect();
        assert_eq!(kept, ["account_id"]);
    }

    #[test]
    fn relations_default_to_empty() {
        let relations = Relations::from_json(r#"{"streams": [{"name": "ads"}]}"#).unwrap();
        assert!(relations.streams[0].relations.is_empty());
    }

    #[test]
    fn discover_output_without_catalog_fails() {
        let err = Catalog::from_discover_output(r#"{"type": "LOG"}"#).unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }
}
