use std::fmt;
use std::sync::Arc;

use tabex_model::ExportOptions;

use crate::error::ScopeError;
use crate::record::Record;

/// Records returned by a scope; they need not share a concrete type.
pub type Records = Vec<Box<dyn Record>>;

type ScopeFn = dyn Fn(&ExportOptions) -> Result<Records, ScopeError> + Send + Sync;

/// Source of the records for one export.
///
/// Called exactly once per export with the invocation options.
#[derive(Clone)]
pub struct Scope(Arc<ScopeFn>);

impl Scope {
    pub fn new<F>(source: F) -> Self
    where
        F: Fn(&ExportOptions) -> Result<Records, ScopeError> + Send + Sync + 'static,
    {
        Self(Arc::new(source))
    }

    pub fn call(&self, options: &ExportOptions) -> Result<Records, ScopeError> {
        (self.0)(options)
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Scope(..)")
    }
}
