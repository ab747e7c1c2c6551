//! One export invocation, from scope to CSV text.

use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

use chrono::{Local, NaiveDate};
use tabex_model::naming::parameterize;
use tabex_model::{CSV_EXTENSION, CSV_MIME_TYPE, CellValue, ExportOptions, ExportTable, ModelName};
use tracing::{debug, info, info_span};

use crate::csv_output::{table_to_string, write_table};
use crate::error::{ExportError, Result};
use crate::record::Record;
use crate::registry::SchemaRegistry;
use crate::resolver::Resolver;
use crate::schema::{Columns, ExportSchema};
use crate::scope::Scope;

/// Short date format used in derived file names, before slugging.
pub const FILE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parameters of a single export.
///
/// `scope` and `fields` override the registered schema for this request
/// only; `options` go to the scope untouched.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub model: String,
    pub scope: Option<Scope>,
    pub fields: Option<Columns>,
    pub options: ExportOptions,
}

impl ExportRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            scope: None,
            fields: None,
            options: ExportOptions::new(),
        }
    }

    #[must_use]
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    #[must_use]
    pub fn with_fields(mut self, fields: Columns) -> Self {
        self.fields = Some(fields);
        self
    }

    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key, value);
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }
}

#[derive(Debug)]
pub struct Exporter {
    schema: Arc<ExportSchema>,
    scope: Scope,
    columns: Columns,
    options: ExportOptions,
}

impl Exporter {
    /// Binds a request to its registered schema.
    ///
    /// Fails when the model is unknown or no scope is available.
    pub fn new(registry: &SchemaRegistry, request: ExportRequest) -> Result<Self> {
        let ExportRequest {
            model,
            scope,
            fields,
            options,
        } = request;
        if model.trim().is_empty() {
            return Err(ExportError::UnresolvableModel { model });
        }
        let schema = registry.resolve(&model)?;
        let scope = scope
            .or_else(|| schema.scope().cloned())
            .ok_or_else(|| ExportError::ScopeNotConfigured {
                model: schema.model().to_string(),
            })?;
        let columns = fields.unwrap_or_else(|| schema.columns().clone());
        Ok(Self {
            schema,
            scope,
            columns,
            options,
        })
    }

    pub fn model(&self) -> &ModelName {
        self.schema.model()
    }

    pub fn partial_name(&self) -> &str {
        self.schema.partial_name()
    }

    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    pub fn header(&self) -> Vec<String> {
        self.columns.headers()
    }

    /// Calls the scope once and resolves every record into a row.
    pub fn table(&self) -> Result<ExportTable> {
        let span = info_span!("export", model = %self.model());
        let _guard = span.enter();
        let start = Instant::now();

        let records = self
            .scope
            .call(&self.options)
            .map_err(|source| ExportError::Scope {
                model: self.model().to_string(),
                source,
            })?;
        debug!(records = records.len(), "scope returned records");

        let mut table = ExportTable::new(self.header());
        for (row, record) in records.iter().enumerate() {
            table.push_row(self.resolve_row(record.as_ref(), row)?)?;
        }
        info!(
            rows = table.len(),
            columns = table.width(),
            duration_ms = start.elapsed().as_millis(),
            "export resolved"
        );
        Ok(table)
    }

    /// Resolves one record against every column in order.
    pub fn resolve_row(&self, record: &dyn Record, row: usize) -> Result<Vec<CellValue>> {
        self.columns
            .iter()
            .map(|column| resolve_cell(record, &column.header, &column.resolver, row))
            .collect()
    }

    /// The whole export rendered as CSV text.
    pub fn data(&self) -> Result<String> {
        table_to_string(&self.table()?)
    }

    /// Writes the CSV export, returning the number of data rows.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<usize> {
        let table = self.table()?;
        write_table(&table, writer)?;
        Ok(table.len())
    }

    /// `Appointments-2024-03-05.csv` style name for today's local date.
    pub fn file_name(&self) -> String {
        self.file_name_on(Local::now().date_naive())
    }

    pub fn file_name_on(&self, date: NaiveDate) -> String {
        let stamp = parameterize(&date.format(FILE_DATE_FORMAT).to_string());
        format!("{}-{stamp}.{CSV_EXTENSION}", self.model().plural())
    }

    pub fn file_type(&self) -> &'static str {
        CSV_MIME_TYPE
    }
}

fn resolve_cell(
    record: &dyn Record,
    header: &str,
    resolver: &Resolver,
    row: usize,
) -> Result<CellValue> {
    resolver
        .resolve(record)
        .map_err(|source| ExportError::Resolution {
            header: header.to_string(),
            row,
            source,
        })
}
