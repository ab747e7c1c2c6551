#![deny(unsafe_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use tabex_model::ModelName;
use tracing::debug;

use crate::error::{ExportError, Result};
use crate::schema::{ExportConfig, ExportSchema, Exportable};

/// Export schemas keyed by model name.
///
/// Populate it during startup, then share it read-only; lookups never
/// mutate.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<ModelName, Arc<ExportSchema>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `T`'s registration block and stores the result under `T`'s
    /// simple type name.
    pub fn register<T: Exportable>(&mut self) -> Result<Arc<ExportSchema>> {
        self.register_as(ModelName::of::<T>(), T::exportable)
    }

    /// Registers a schema built by `block` from a fresh [`ExportConfig`].
    ///
    /// A later registration for the same model replaces the earlier one
    /// entirely. If `block` fails, the registry is left unchanged.
    pub fn register_as<F>(&mut self, model: ModelName, block: F) -> Result<Arc<ExportSchema>>
    where
        F: FnOnce(&mut ExportConfig) -> Result<()>,
    {
        if model.is_empty() {
            return Err(ExportError::invalid("model name must not be empty"));
        }
        let mut config = ExportConfig::new();
        block(&mut config)?;
        let schema = Arc::new(ExportSchema::new(model.clone(), config));
        let replaced = self.schemas.insert(model.clone(), Arc::clone(&schema));
        debug!(
            model = %model,
            columns = schema.columns().len(),
            replaced = replaced.is_some(),
            "registered export schema"
        );
        Ok(schema)
    }

    /// Looks a schema up by simple or qualified model name.
    pub fn get(&self, model: &str) -> Option<Arc<ExportSchema>> {
        self.schemas.get(&ModelName::new(model)).cloned()
    }

    pub fn resolve(&self, model: &str) -> Result<Arc<ExportSchema>> {
        self.get(model)
            .ok_or_else(|| ExportError::UnresolvableModel {
                model: model.to_string(),
            })
    }

    pub fn models(&self) -> impl Iterator<Item = &ModelName> {
        self.schemas.keys()
    }

    pub fn schemas(&self) -> impl Iterator<Item = &Arc<ExportSchema>> {
        self.schemas.values()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
