//! Export pipeline shared by the CLI commands.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tabex_core::csv_output::table_to_string;
use tabex_core::{CellValue, ExportOptions, ExportRequest, Exporter, Resolver, SchemaRegistry};
use tracing::info;

/// Where an export's CSV text goes.
#[derive(Debug, Clone)]
pub enum OutputTarget {
    /// Write `<dir>/<derived file name>`.
    Directory(PathBuf),
    /// Return the text to the caller for printing.
    Stdout,
}

#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub model: String,
    pub partial_name: String,
    pub rows: usize,
    pub columns: usize,
    pub file_type: &'static str,
    pub path: Option<PathBuf>,
    /// CSV text, kept only for [`OutputTarget::Stdout`].
    pub data: Option<String>,
}

/// Runs one export against a loaded registry.
pub fn run_export(
    registry: &SchemaRegistry,
    model: &str,
    options: ExportOptions,
    target: &OutputTarget,
) -> Result<ExportOutcome> {
    let exporter = Exporter::new(registry, ExportRequest::new(model).with_options(options))
        .with_context(|| format!("prepare export for {model}"))?;
    let table = exporter
        .table()
        .with_context(|| format!("export {model}"))?;
    let data = table_to_string(&table).context("render CSV")?;

    let mut outcome = ExportOutcome {
        model: exporter.model().to_string(),
        partial_name: exporter.partial_name().to_string(),
        rows: table.len(),
        columns: table.width(),
        file_type: exporter.file_type(),
        path: None,
        data: None,
    };
    match target {
        OutputTarget::Directory(dir) => {
            let path = write_export(dir, &exporter.file_name(), &data)?;
            info!(path = %path.display(), rows = outcome.rows, "wrote export");
            outcome.path = Some(path);
        }
        OutputTarget::Stdout => outcome.data = Some(data),
    }
    Ok(outcome)
}

/// One registered column, as listed by `tabex models`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSummary {
    pub model: String,
    pub partial_name: String,
    pub header: String,
    pub resolver: String,
}

/// Every registered column in model order, then declaration order.
pub fn describe_models(registry: &SchemaRegistry) -> Vec<ColumnSummary> {
    registry
        .schemas()
        .flat_map(|schema| {
            schema.columns().iter().map(move |column| ColumnSummary {
                model: schema.model().to_string(),
                partial_name: schema.partial_name().to_string(),
                header: column.header.clone(),
                resolver: describe_resolver(&column.resolver),
            })
        })
        .collect()
}

fn describe_resolver(resolver: &Resolver) -> String {
    match resolver {
        Resolver::Callable(_) => "computed".to_string(),
        Resolver::Value(CellValue::Text(name)) => format!("{name:?}"),
        Resolver::Value(value) => format!("literal {value}"),
    }
}

fn write_export(dir: &Path, file_name: &str, data: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let path = dir.join(file_name);
    fs::write(&path, data).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}
