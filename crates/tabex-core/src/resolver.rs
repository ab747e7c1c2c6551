//! Per-column value resolution.
//!
//! A resolver is either a callable or a plain value. Which of the three
//! strategies applies is decided for every cell, because one scope may
//! yield records of different shapes:
//!
//! 1. callables run against the record; a missing-member failure becomes
//!    [`FIELD_ERROR_PLACEHOLDER`] for that cell only,
//! 2. a text value naming a member the record responds to invokes that member,
//! 3. anything else is copied into the cell verbatim.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use tabex_model::{CellValue, FIELD_ERROR_PLACEHOLDER, ModelName, ResolveError};
use tracing::debug;

use crate::record::Record;

/// Callable resolver body. The record is passed explicitly.
pub type CellFn = dyn Fn(&dyn Record) -> Result<CellValue, ResolveError> + Send + Sync;

#[derive(Clone)]
pub enum Resolver {
    Callable(Arc<CellFn>),
    Value(CellValue),
}

/// Strategy chosen for one (record, resolver) pair.
pub enum Dispatch<'a> {
    Callable(&'a CellFn),
    Member(&'a str),
    Literal(&'a CellValue),
}

impl Dispatch<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Callable(_) => "callable",
            Self::Member(_) => "member",
            Self::Literal(_) => "literal",
        }
    }
}

impl Resolver {
    pub fn call<F, V>(body: F) -> Self
    where
        F: Fn(&dyn Record) -> Result<V, ResolveError> + Send + Sync + 'static,
        V: Into<CellValue>,
    {
        Self::Callable(Arc::new(move |record: &dyn Record| {
            body(record).map(Into::into)
        }))
    }

    /// Callable written against one concrete record type.
    ///
    /// Records of any other type fail with [`ResolveError::WrongShape`],
    /// which resolves to the placeholder.
    pub fn typed<T, F, V>(body: F) -> Self
    where
        T: Record,
        F: Fn(&T) -> V + Send + Sync + 'static,
        V: Into<CellValue>,
    {
        let expected = ModelName::of::<T>().to_string();
        Self::call(move |record: &dyn Record| {
            let any: &dyn Any = record;
            any.downcast_ref::<T>()
                .map(&body)
                .ok_or_else(|| ResolveError::WrongShape {
                    expected: expected.clone(),
                })
        })
    }

    /// Member name; falls back to the name itself when the record lacks it.
    pub fn member(name: impl Into<String>) -> Self {
        Self::Value(CellValue::Text(name.into()))
    }

    pub fn literal(value: impl Into<CellValue>) -> Self {
        Self::Value(value.into())
    }

    /// Callable that renders `{member}` references against the record.
    ///
    /// `"{first_name} {last_name}"`. A `{` without a closing `}` is kept as text.
    pub fn template(pattern: &str) -> Self {
        let segments = parse_template(pattern);
        Self::call(move |record: &dyn Record| {
            let mut rendered = String::new();
            for segment in &segments {
                match segment {
                    Segment::Text(text) => rendered.push_str(text),
                    Segment::Member(member) => {
                        rendered.push_str(&record.get(member)?.to_string());
                    }
                }
            }
            Ok(rendered)
        })
    }

    pub fn dispatch<'a>(&'a self, record: &dyn Record) -> Dispatch<'a> {
        match self {
            Self::Callable(body) => Dispatch::Callable(body.as_ref()),
            Self::Value(CellValue::Text(name)) if record.responds_to(name) => {
                Dispatch::Member(name)
            }
            Self::Value(value) => Dispatch::Literal(value),
        }
    }

    /// Resolves one cell.
    ///
    /// Only recoverable callable failures are absorbed; member invocation
    /// errors and every other callable failure are returned.
    pub fn resolve(&self, record: &dyn Record) -> Result<CellValue, ResolveError> {
        match self.dispatch(record) {
            Dispatch::Callable(body) => match body(record) {
                Ok(value) => Ok(value),
                Err(error) if error.is_recoverable() => {
                    debug!(%error, "substituting placeholder for unresolvable cell");
                    Ok(CellValue::from(FIELD_ERROR_PLACEHOLDER))
                }
                Err(error) => Err(error),
            },
            Dispatch::Member(name) => record.call(name),
            Dispatch::Literal(value) => Ok(value.clone()),
        }
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callable(_) => f.write_str("Callable(..)"),
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

impl From<&str> for Resolver {
    fn from(value: &str) -> Self {
        Self::member(value)
    }
}

impl From<String> for Resolver {
    fn from(value: String) -> Self {
        Self::member(value)
    }
}

impl From<CellValue> for Resolver {
    fn from(value: CellValue) -> Self {
        Self::Value(value)
    }
}

impl From<i64> for Resolver {
    fn from(value: i64) -> Self {
        Self::literal(value)
    }
}

impl From<f64> for Resolver {
    fn from(value: f64) -> Self {
        Self::literal(value)
    }
}

impl From<bool> for Resolver {
    fn from(value: bool) -> Self {
        Self::literal(value)
    }
}

enum Segment {
    Text(String),
    Member(String),
}

fn parse_template(pattern: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = pattern;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        if open > 0 {
            segments.push(Segment::Text(rest[..open].to_string()));
        }
        segments.push(Segment::Member(
            rest[open + 1..open + close].trim().to_string(),
        ));
        rest = &rest[open + close + 1..];
    }
    if !rest.is_empty() {
        segments.push(Segment::Text(rest.to_string()));
    }
    segments
}
