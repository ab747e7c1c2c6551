//! Declarative export schemas.
//!
//! A model type describes its export once through [`ExportConfig`]; the
//! registry turns the finished configuration into an immutable
//! [`ExportSchema`].

use serde_json::Value;
use tabex_model::ModelName;
use tracing::warn;

use crate::error::{ExportError, Result};
use crate::record::json_to_cell;
use crate::resolver::Resolver;
use crate::scope::Scope;

/// Message used when a dynamic `fields` value is not an array.
pub const FIELDS_NOT_ORDERED: &str = "fields must be an ordered sequence";

#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub header: String,
    pub resolver: Resolver,
}

/// Ordered columns keyed by header.
///
/// Re-inserting a header replaces its resolver in place, so the column keeps
/// the position of its first insertion.
#[derive(Debug, Clone, Default)]
pub struct Columns {
    specs: Vec<ColumnSpec>,
}

impl Columns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a column, returning the resolver it replaced.
    pub fn insert(
        &mut self,
        header: impl Into<String>,
        resolver: impl Into<Resolver>,
    ) -> Option<Resolver> {
        let header = header.into();
        let resolver = resolver.into();
        if let Some(existing) = self.specs.iter_mut().find(|spec| spec.header == header) {
            warn!(header = %header, "duplicate export column; later resolver wins");
            return Some(std::mem::replace(&mut existing.resolver, resolver));
        }
        self.specs.push(ColumnSpec { header, resolver });
        None
    }

    pub fn get(&self, header: &str) -> Option<&Resolver> {
        self.specs
            .iter()
            .find(|spec| spec.header == header)
            .map(|spec| &spec.resolver)
    }

    pub fn headers(&self) -> Vec<String> {
        self.specs.iter().map(|spec| spec.header.clone()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Builds columns from a JSON array of `[header, resolver]` pairs.
    ///
    /// Strings become member-or-literal resolvers, `{"template": "..."}`
    /// becomes a template callable, other scalars are literals.
    pub fn from_json(value: &Value) -> Result<Self> {
        let Value::Array(pairs) = value else {
            return Err(ExportError::invalid(FIELDS_NOT_ORDERED));
        };
        let mut columns = Self::new();
        for (index, pair) in pairs.iter().enumerate() {
            let (header, resolver) = match pair.as_array().map(Vec::as_slice) {
                Some([Value::String(header), resolver]) => (header, resolver),
                _ => {
                    return Err(ExportError::invalid(format!(
                        "field {index} must be a [header, resolver] pair"
                    )));
                }
            };
            columns.insert(header.as_str(), resolver_from_json(resolver)?);
        }
        Ok(columns)
    }
}

impl<'a> IntoIterator for &'a Columns {
    type Item = &'a ColumnSpec;
    type IntoIter = std::slice::Iter<'a, ColumnSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<H: Into<String>, R: Into<Resolver>> FromIterator<(H, R)> for Columns {
    fn from_iter<I: IntoIterator<Item = (H, R)>>(iter: I) -> Self {
        let mut columns = Self::new();
        for (header, resolver) in iter {
            columns.insert(header, resolver);
        }
        columns
    }
}

fn resolver_from_json(value: &Value) -> Result<Resolver> {
    match value {
        Value::String(name) => Ok(Resolver::member(name.as_str())),
        Value::Object(map) => match map.get("template") {
            Some(Value::String(pattern)) if map.len() == 1 => Ok(Resolver::template(pattern)),
            _ => Err(ExportError::invalid(format!(
                "unsupported field resolver {value}; expected a string, scalar or {{\"template\": ...}}"
            ))),
        },
        Value::Array(_) => Err(ExportError::invalid(format!(
            "unsupported field resolver {value}"
        ))),
        scalar => Ok(Resolver::Value(json_to_cell(scalar))),
    }
}

/// Registration block state.
///
/// Getters return what the block has set so far; setters replace it.
#[derive(Debug, Clone, Default)]
pub struct ExportConfig {
    scope: Option<Scope>,
    fields: Option<Columns>,
}

impl ExportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scope(&self) -> Option<&Scope> {
        self.scope.as_ref()
    }

    pub fn set_scope(&mut self, scope: Scope) -> &mut Self {
        self.scope = Some(scope);
        self
    }

    pub fn fields(&self) -> Option<&Columns> {
        self.fields.as_ref()
    }

    /// Sets the ordered `(header, resolver)` pairs.
    pub fn set_fields<I, H, R>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = (H, R)>,
        H: Into<String>,
        R: Into<Resolver>,
    {
        self.fields = Some(fields.into_iter().collect());
        self
    }

    /// Sets fields from an untyped source; see [`Columns::from_json`].
    pub fn set_fields_json(&mut self, fields: &Value) -> Result<&mut Self> {
        self.fields = Some(Columns::from_json(fields)?);
        Ok(self)
    }
}

/// A model type's registered export shape. Immutable once built.
#[derive(Debug, Clone)]
pub struct ExportSchema {
    model: ModelName,
    partial_name: String,
    scope: Option<Scope>,
    columns: Columns,
}

impl ExportSchema {
    pub fn new(model: ModelName, config: ExportConfig) -> Self {
        Self {
            partial_name: model.partial_name(),
            model,
            scope: config.scope,
            columns: config.fields.unwrap_or_default(),
        }
    }

    pub fn model(&self) -> &ModelName {
        &self.model
    }

    /// Label derived from the model name, e.g. `group_sessions`.
    pub fn partial_name(&self) -> &str {
        &self.partial_name
    }

    pub fn scope(&self) -> Option<&Scope> {
        self.scope.as_ref()
    }

    pub fn columns(&self) -> &Columns {
        &self.columns
    }
}

/// Implemented by model types that declare an export schema.
pub trait Exportable {
    fn exportable(config: &mut ExportConfig) -> Result<()>;
}
