//! Data model shared by the tabular export engine.

pub mod error;
pub mod ids;
pub mod naming;
pub mod options;
pub mod table;
pub mod value;

pub use error::{ModelError, ResolveError, Result};
pub use ids::ModelName;
pub use options::ExportOptions;
pub use table::ExportTable;
pub use value::CellValue;

/// Text written into a cell whose callable resolver could not reach a member
/// of the record it was handed.
pub const FIELD_ERROR_PLACEHOLDER: &str = "Error getting field value";

/// MIME type of the generated export.
pub const CSV_MIME_TYPE: &str = "text/csv";

/// Extension appended to derived export file names.
pub const CSV_EXTENSION: &str = "csv";
