//! CLI command implementations
//!
//! Every command loads the index configuration, rebuilds a fresh manager
//! from the data file and prints one JSON response. Nothing is persisted.

use std::path::Path;

use serde_json::{json, Value};

use crate::index::{
    CandidateResult, EntityId, IndexManager, SortDirection, TraversalOptions, Where,
};
use crate::observability::{Logger, Severity};

use super::args::{Command, Source};
use super::errors::{CliError, CliResult};
use super::io::{read_json, write_error, write_response};

/// Parse arguments, run the command and print its response.
///
/// On failure the error response has already been printed.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    if cli.trace {
        Logger::set_min_severity(Severity::Trace);
    }
    match run_command(cli.command) {
        Ok(data) => write_response(data),
        Err(e) => {
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}

/// Run a command and return its response payload
pub fn run_command(cmd: Command) -> CliResult<Value> {
    match cmd {
        Command::Query {
            source,
            predicate,
            verify,
        } => query(&source, &predicate, verify),
        Command::Stats { source } => stats(&source),
        Command::Order {
            source,
            field,
            desc,
            offset,
            limit,
            predicate,
        } => {
            let direction = if desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            };
            order(&source, &field, direction, offset, limit, predicate.as_deref())
        }
    }
}

/// Build a manager from the configuration and index every entity
pub fn load(source: &Source) -> CliResult<(IndexManager, Vec<Value>)> {
    let config = read_json(&source.config, |m| CliError::config_error(m))?;
    let mut manager = IndexManager::from_json(&config)?;

    let entities = load_entities(&source.data)?;
    manager.rebuild(&entities)?;
    Ok((manager, entities))
}

fn load_entities(path: &Path) -> CliResult<Vec<Value>> {
    match read_json(path, |m| CliError::data_error(m))? {
        Value::Array(items) => Ok(items),
        other => Err(CliError::data_error(format!(
            "Data file must hold a JSON array, found {}",
            json_type(&other)
        ))),
    }
}

/// Parse a predicate argument. `null` means no predicate.
pub fn parse_predicate(raw: &str) -> CliResult<Option<Where>> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| CliError::predicate_error(format!("Invalid predicate JSON: {}", e)))?;
    match value {
        Value::Null => Ok(None),
        Value::Object(_) => Ok(Where::from_json(&value)),
        other => Err(CliError::predicate_error(format!(
            "Predicate must be a JSON object, found {}",
            json_type(&other)
        ))),
    }
}

/// Resolve a predicate; with `verify`, also report which entities truly match
pub fn query(source: &Source, raw_predicate: &str, verify: bool) -> CliResult<Value> {
    let (mut manager, entities) = load(source)?;
    let predicate = parse_predicate(raw_predicate)?;

    let result = manager.collect_candidates(predicate.as_ref());
    let mut data = json!({
        "result": result_json(&result),
        "plan": manager.last_query_plan(),
    });

    if verify {
        let id_field = manager.id_field().to_string();
        let verified: Vec<EntityId> = entities
            .iter()
            .filter_map(|entity| {
                let id = EntityId::of(entity, &id_field).ok()?;
                let admitted = match result.ids() {
                    Some(ids) => ids.contains(&id),
                    None => !result.is_empty(),
                };
                let matches = predicate
                    .as_ref()
                    .map_or(true, |p| manager.matches(p, entity));
                (admitted && matches).then_some(id)
            })
            .collect();
        data["verified"] = json!(verified);
    }

    Ok(data)
}

/// Snapshots of every configured index
pub fn stats(source: &Source) -> CliResult<Value> {
    let (manager, _) = load(source)?;
    Ok(serde_json::to_value(manager.index_snapshots())?)
}

/// IDs in value order of a number or date field
pub fn order(
    source: &Source,
    field: &str,
    direction: SortDirection,
    offset: usize,
    limit: Option<usize>,
    raw_predicate: Option<&str>,
) -> CliResult<Value> {
    let (mut manager, _) = load(source)?;
    if !manager.has_index(field) {
        return Err(CliError::not_orderable(field));
    }

    let filter = match raw_predicate {
        Some(raw) => {
            let predicate = parse_predicate(raw)?;
            manager.collect_candidates(predicate.as_ref())
        }
        None => CandidateResult::Unsupported,
    };
    if filter.is_empty() {
        return Ok(json!([]));
    }

    let options = TraversalOptions {
        candidates: filter.ids(),
        offset,
        limit,
    };
    let ids = manager
        .ordered_keys(field, direction, options)
        .ok_or_else(|| CliError::not_orderable(field))?;
    Ok(json!(ids))
}

fn result_json(result: &CandidateResult) -> Value {
    let mut value = serde_json::to_value(result.shape()).unwrap_or(Value::Null);
    if let Some(ids) = result.ids() {
        value["ids"] = json!(ids);
    }
    value
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
