use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("row has {found} cells but the header has {expected} columns")]
    RowWidth { expected: usize, found: usize },
}

pub type Result<T> = std::result::Result<T, ModelError>;

/// Failure raised while resolving a single cell.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The record has no member with this name.
    #[error("undefined member `{member}`")]
    MissingMember { member: String },

    /// A typed resolver was handed a record of another type.
    #[error("record is not a `{expected}`")]
    WrongShape { expected: String },

    #[error("{0}")]
    Failed(String),
}

impl ResolveError {
    pub fn missing(member: impl Into<String>) -> Self {
        Self::MissingMember {
            member: member.into(),
        }
    }

    pub fn failed(message: impl std::fmt::Display) -> Self {
        Self::Failed(message.to_string())
    }

    /// Whether a callable resolver may replace this failure with the
    /// placeholder text instead of aborting the export.
    ///
    /// Both variants mean the record lacks what the resolver reached for.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::MissingMember { .. } | Self::WrongShape { .. })
    }
}
