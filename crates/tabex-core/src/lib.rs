//! Declarative tabular export engine.
//!
//! Model types register an [`ExportSchema`] (ordered columns plus a record
//! scope) in a [`SchemaRegistry`]; an [`Exporter`] turns one request into a
//! CSV document:
//!
//! ```ignore
//! let mut registry = SchemaRegistry::new();
//! registry.register::<Appointment>()?;
//! let exporter = Exporter::new(&registry, ExportRequest::new("Appointment"))?;
//! let csv = exporter.data()?;
//! ```

pub mod csv_output;
pub mod error;
pub mod exporter;
pub mod record;
pub mod registry;
pub mod resolver;
pub mod schema;
pub mod scope;

pub use error::{ExportError, Result, ScopeError};
pub use exporter::{ExportRequest, Exporter};
pub use record::{Record, json_to_cell};
pub use registry::SchemaRegistry;
pub use resolver::{Dispatch, Resolver};
pub use schema::{ColumnSpec, Columns, ExportConfig, ExportSchema, Exportable};
pub use scope::{Records, Scope};

pub use tabex_model::{
    CSV_MIME_TYPE, CellValue, ExportOptions, ExportTable, FIELD_ERROR_PLACEHOLDER, ModelName,
    ResolveError,
};
