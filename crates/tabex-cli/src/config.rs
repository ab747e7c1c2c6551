//! JSON schema files.
//!
//! ```json
//! {
//!   "models": [
//!     {
//!       "name": "Appointment",
//!       "records": "appointments.json",
//!       "fields": [["Patient", "patient"], ["Clinic", "Downtown"]]
//!     }
//!   ]
//! }
//! ```
//!
//! `records` names a JSON array of objects, relative to the schema file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tabex_core::{ExportOptions, ModelName, Record, Records, SchemaRegistry, Scope, ScopeError};
use tracing::{debug, info};

/// Option limiting the number of exported records.
pub const LIMIT_OPTION: &str = "limit";

#[derive(Debug, Deserialize)]
pub struct SchemaFile {
    pub models: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ModelEntry {
    pub name: String,
    pub records: PathBuf,
    #[serde(default)]
    pub fields: Value,
}

pub fn load_schema_file(path: &Path) -> Result<SchemaFile> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read schema file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse schema file {}", path.display()))
}

/// Registers every model of a schema file.
pub fn load_registry(path: &Path) -> Result<SchemaRegistry> {
    let file = load_schema_file(path)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let mut registry = SchemaRegistry::new();
    for entry in file.models {
        let records = base.join(&entry.records);
        debug!(model = %entry.name, records = %records.display(), "registering model");
        registry
            .register_as(ModelName::new(&entry.name), |config| {
                config.set_scope(json_file_scope(records));
                config.set_fields_json(&entry.fields)?;
                Ok(())
            })
            .with_context(|| format!("register model {}", entry.name))?;
    }
    info!(
        schema = %path.display(),
        models = registry.len(),
        "loaded export schemas"
    );
    Ok(registry)
}

/// Scope reading a JSON array file on every export.
pub fn json_file_scope(path: PathBuf) -> Scope {
    Scope::new(move |options: &ExportOptions| {
        let text = fs::read_to_string(&path)
            .map_err(|err| format!("read records {}: {err}", path.display()))?;
        let records: Vec<Value> = serde_json::from_str(&text)
            .map_err(|err| format!("parse records {}: {err}", path.display()))?;
        let records = filter_records(records, options)?;
        Ok(records
            .into_iter()
            .map(|record| Box::new(record) as Box<dyn Record>)
            .collect::<Records>())
    })
}

/// Applies `limit` and equality filters (`member=value`) to JSON records.
///
/// A record without the filtered member is dropped.
pub fn filter_records(
    records: Vec<Value>,
    options: &ExportOptions,
) -> Result<Vec<Value>, ScopeError> {
    let limit = options
        .get(LIMIT_OPTION)
        .map(str::parse::<usize>)
        .transpose()
        .map_err(|err| format!("invalid {LIMIT_OPTION} option: {err}"))?;
    let filtered = records.into_iter().filter(|record| {
        options
            .iter()
            .filter(|(key, _)| *key != LIMIT_OPTION)
            .all(|(key, expected)| {
                Record::get(record, key).is_ok_and(|cell| cell.to_string() == expected)
            })
    });
    Ok(match limit {
        Some(limit) => filtered.take(limit).collect(),
        None => filtered.collect(),
    })
}
