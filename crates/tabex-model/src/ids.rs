use std::fmt;

use serde::{Deserialize, Serialize};

use crate::naming::{demodulize, pluralize, underscore};

/// Simple (unqualified) name of an exportable model type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelName(String);

impl ModelName {
    /// Strips module paths and generic arguments, so `clinic::Appointment`
    /// and `Appointment` name the same model.
    pub fn new(name: &str) -> Self {
        Self(demodulize(name).to_string())
    }

    pub fn of<T: ?Sized>() -> Self {
        Self::new(std::any::type_name::<T>())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Appointment` -> `Appointments`.
    pub fn plural(&self) -> String {
        pluralize(&self.0)
    }

    /// `GroupSession` -> `group_sessions`.
    pub fn partial_name(&self) -> String {
        pluralize(&underscore(&self.0))
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ModelName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
