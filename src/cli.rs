//! Minimal CLI: load schemas → (rewrite | classify | dbml)
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use serde_json::Value;
use tracing::{debug, info};

use crate::catalog::{Catalog, Relations};
use crate::classify::classify_value;
use crate::mapper::Pipeline;
use crate::node;
use crate::strategy::StrategyKind;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// classify and rewrite JSON-Schema documents with pluggable per-shape strategies
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    /// debug-level logging (overridden by RUST_LOG)
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// rewrite each document through one or more strategies
    Rewrite(RewriteOut),
    /// print the category of each document
    Classify(ClassifyOut),
    /// render a connector catalog as DBML tables
    Dbml(DbmlOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /streams/0/json_schema)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct RewriteOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// strategies applied in order; each output is re-classified by the next
    #[arg(long, short, value_enum, default_values_t = [StrategyKind::Identity])]
    strategy: Vec<StrategyKind>,

    /// reject documents nested deeper than this before rewriting
    #[arg(long)]
    max_depth: Option<usize>,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct ClassifyOut {
    #[command(flatten)]
    input_settings: InputSettings,
}

#[derive(clap::Parser, Debug)]
struct DbmlOut {
    /// catalog file (`{"streams": [...]}`)
    #[arg(long, short)]
    input: PathBuf,

    /// input is raw discover output; the CATALOG message is extracted
    #[arg(long, default_value_t = false)]
    discover: bool,

    /// relations file (`{"streams": [{"name": ..., "relations": {"col": "table.column"}}]}`)
    #[arg(long)]
    relations: Option<PathBuf>,

    /// output .dbml file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

/// A loaded document with a label naming where it came from.
struct Document {
    source: String,
    value: Value,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load(&self) -> Result<Vec<Document>> {
        let source_paths = resolve_file_path_patterns(&self.input)
            .context("failed to resolve input file paths")?;
        let mut docs = Vec::new();
        for source_path in source_paths {
            let source_path_str = source_path.to_string_lossy().to_string();
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file ({source_path_str})"))?;
            let values = if self.ndjson {
                source
                    .lines()
                    .enumerate()
                    .filter(|(_, line)| !line.trim().is_empty())
                    .map(|(ix, line)| {
                        serde_json::from_str::<Value>(line).with_context(|| {
                            format!("failed to parse NDJSON line {} ({source_path_str})", ix + 1)
                        })
                    })
                    .collect::<Result<Vec<_>>>()?
            } else {
                vec![serde_json::from_str::<Value>(&source)
                    .with_context(|| format!("failed to parse JSON source file ({source_path_str})"))?]
            };
            for value in values {
                for value in self.preprocess(value, &source_path_str)? {
                    docs.push(Document { source: source_path_str.clone(), value });
                }
            }
        }
        debug!(documents = docs.len(), "loaded inputs");
        Ok(docs)
    }

    fn preprocess(&self, value: Value, source_path_str: &str) -> Result<Vec<Value>> {
        let value = match self.json_pointer.as_deref() {
            None => value,
            Some(pointer) => value
                .pointer(pointer)
                .cloned()
                .with_context(|| format!("JSON pointer {pointer} matched nothing ({source_path_str})"))?,
        };
        match self.jq_expr.as_deref() {
            None => Ok(vec![value]),
            Some(jq_expr) => crate::jq_exec::run_jaq(jq_expr, &value).with_context(|| {
                format!("failed to apply jq expression to source file ({source_path_str})")
            }),
        }
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Rewrite(target) => {
                let docs = target.input_settings.load()?;
                let pipeline: Pipeline = target.strategy.iter().map(|s| s.mapper()).collect();
                info!(documents = docs.len(), strategies = ?target.strategy, "rewriting");

                let rewritten = docs
                    .par_iter()
                    .map(|doc| {
                        if let Some(max) = target.max_depth {
                            let depth = node::depth(&doc.value);
                            if depth > max {
                                bail!("{}: schema depth {depth} exceeds --max-depth {max}", doc.source);
                            }
                        }
                        pipeline
                            .rewrite_value(&doc.value)
                            .with_context(|| format!("failed to rewrite {}", doc.source))
                    })
                    .collect::<Result<Vec<_>>>()?;

                let output = match <[Value; 1]>::try_from(rewritten) {
                    Ok([single]) => single,
                    Err(many) => Value::Array(many),
                };
                let output_src = serde_json::to_string_pretty(&output)?;
                emit(target.out.as_deref(), &output_src)
            }
            Command::Classify(target) => {
                let docs = target.input_settings.load()?;
                for doc in &docs {
                    match classify_value(&doc.value) {
                        Ok(category) => println!("{}\t{}", doc.source, category.to_string().green()),
                        Err(error) => println!("{}\t{}", doc.source, error.to_string().red()),
                    }
                }
                Ok(())
            }
            Command::Dbml(target) => {
                let source = std::fs::read_to_string(&target.input)
                    .with_context(|| format!("failed to read catalog ({})", target.input.display()))?;
                let catalog = if target.discover {
                    Catalog::from_discover_output(&source)?
                } else {
                    Catalog::from_json(&source)?
                };
                info!(streams = catalog.streams.len(), "rendering dbml");
                let relations = match &target.relations {
                    Some(path) => {
                        let source = std::fs::read_to_string(path)
                            .with_context(|| format!("failed to read relations ({})", path.display()))?;
                        let mut relations = Relations::from_json(&source)?;
                        let dropped = relations.prune(&catalog);
                        debug!(dropped = dropped.len(), "pruned relations");
                        Some(relations)
                    }
                    None => None,
                };
                let dbml = crate::dbml::render_dbml(&catalog, relations.as_ref())?;
                emit(target.out.as_deref(), &dbml)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn emit(out: Option<&Path>, contents: &str) -> Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(out, contents)
                .with_context(|| format!("failed to write {}", out.display()))?;
            info!(path = %out.display(), "wrote output");
        }
        None => println!("{contents}"),
    }
    Ok(())
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repeated_strategies() {
        let cli = CommandLineInterface::try_parse_from([
            "schema-mapper", "rewrite", "-i", "a.json", "-s", "nullable", "-s", "columns",
        ])
        .unwrap();
        let Command::Rewrite(target) = cli.cmd else { panic!("expected rewrite") };
        assert_eq!(target.strategy, vec![StrategyKind::Nullable, StrategyKind::Columns]);
    }

    #[test]
    fn strategy_defaults_to_identity() {
        let cli = CommandLineInterface::try_parse_from(["schema-mapper", "rewrite", "-i", "a.json"]).unwrap();
        let Command::Rewrite(target) = cli.cmd else { panic!("expected rewrite") };
        assert_eq!(target.strategy, vec![StrategyKind::Identity]);
    }

    #[test]
    fn dbml_accepts_a_relations_file() {
        let cli = CommandLineInterface::try_parse_from([
            "schema-mapper", "dbml", "-i", "catalog.json", "--relations", "erd.json",
        ])
        .unwrap();
        let Command::Dbml(target) = cli.cmd else { panic!("expected dbml") };
        assert_eq!(target.relations, Some(PathBuf::from("erd.json")));
        assert!(!target.discover);
    }

    #[test]
    fn literal_paths_pass_through() {
        let paths = resolve_file_path_patterns(["x/y.json"]).unwrap();
        assert_eq!(paths, vec![PathBuf::from("x/y.json")]);
    }

    #[test]
    fn unmatched_glob_is_an_error() {
        assert!(resolve_file_path_patterns(["/definitely/not/here/*.json"]).is_err());
    }

    #[test]
    fn json_pointer_selects_subnode() {
        let settings = InputSettings {
            ndjson: false,
            json_pointer: Some("/streams/0/json_schema".into()),
            jq_expr: None,
            input: vec![],
        };
        let doc = serde_json::json!({"streams": [{"json_schema": {"type": "null"}}]});
        let out = settings.preprocess(doc, "mem").unwrap();
        assert_eq!(out, vec![serde_json::json!({"type": "null"})]);
    }
}
