//! Capability-checked access to the members of an exported record.

use std::any::Any;
use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tabex_model::{CellValue, ResolveError};

/// A record the exporter can read members from by name.
///
/// Scopes may hand back records of different concrete types in one export,
/// so the exporter only ever sees `&dyn Record`.
pub trait Record: Any {
    /// Whether a member with this name exists on the record.
    fn responds_to(&self, member: &str) -> bool;

    /// Invokes a member with no arguments.
    fn call(&self, member: &str) -> Result<CellValue, ResolveError>;

    /// Like [`Record::call`], but reports absent members as
    /// [`ResolveError::MissingMember`] without invoking anything.
    fn get(&self, member: &str) -> Result<CellValue, ResolveError> {
        if self.responds_to(member) {
            self.call(member)
        } else {
            Err(ResolveError::missing(member))
        }
    }

    /// Integer member. A missing value counts as a missing member.
    fn get_i64(&self, member: &str) -> Result<i64, ResolveError> {
        let value = present(member, self.get(member)?)?;
        value
            .as_i64()
            .ok_or_else(|| ResolveError::failed(format!("member `{member}` is not an integer")))
    }

    fn get_f64(&self, member: &str) -> Result<f64, ResolveError> {
        let value = present(member, self.get(member)?)?;
        value
            .as_f64()
            .ok_or_else(|| ResolveError::failed(format!("member `{member}` is not a number")))
    }

    /// Any present member, stringified.
    fn get_str(&self, member: &str) -> Result<String, ResolveError> {
        Ok(present(member, self.get(member)?)?.to_string())
    }
}

fn present(member: &str, value: CellValue) -> Result<CellValue, ResolveError> {
    if value.is_missing() {
        Err(ResolveError::missing(member))
    } else {
        Ok(value)
    }
}

/// Implements [`Record`] for a struct by exposing the listed fields.
///
/// Every listed field must convert into a [`CellValue`] via `From`.
///
/// ```ignore
/// impl_record!(Appointment { name, value });
/// ```
#[macro_export]
macro_rules! impl_record {
    ($ty:ty { $($member:ident),+ $(,)? }) => {
        impl $crate::Record for $ty {
            fn responds_to(&self, member: &str) -> bool {
                matches!(member, $(stringify!($member))|+)
            }

            fn call(
                &self,
                member: &str,
            ) -> ::std::result::Result<$crate::CellValue, $crate::ResolveError> {
                match member {
                    $(stringify!($member) => Ok($crate::CellValue::from(self.$member.clone())),)+
                    _ => Err($crate::ResolveError::missing(member)),
                }
            }
        }
    };
}

/// Converts a JSON value into a cell. Arrays and objects keep their JSON text.
pub fn json_to_cell(value: &Value) -> CellValue {
    match value {
        Value::Null => CellValue::Missing,
        Value::Bool(flag) => CellValue::Bool(*flag),
        Value::Number(number) => number
            .as_i64()
            .map(CellValue::Integer)
            .or_else(|| number.as_f64().map(CellValue::Float))
            .unwrap_or_else(|| CellValue::Text(number.to_string())),
        Value::String(text) => CellValue::Text(text.clone()),
        Value::Array(_) | Value::Object(_) => CellValue::Text(value.to_string()),
    }
}

impl Record for Map<String, Value> {
    fn responds_to(&self, member: &str) -> bool {
        self.contains_key(member)
    }

    fn call(&self, member: &str) -> Result<CellValue, ResolveError> {
        self.get(member)
            .map(json_to_cell)
            .ok_or_else(|| ResolveError::missing(member))
    }
}

impl Record for Value {
    fn responds_to(&self, member: &str) -> bool {
        self.as_object().is_some_and(|map| map.contains_key(member))
    }

    fn call(&self, member: &str) -> Result<CellValue, ResolveError> {
        match self.as_object() {
            Some(map) => Record::call(map, member),
            None => Err(ResolveError::missing(member)),
        }
    }
}

impl Record for BTreeMap<String, CellValue> {
    fn responds_to(&self, member: &str) -> bool {
        self.contains_key(member)
    }

    fn call(&self, member: &str) -> Result<CellValue, ResolveError> {
        self.get(member)
            .cloned()
            .ok_or_else(|| ResolveError::missing(member))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn json_object_members() {
        let record = json!({"name": "a", "value": 5, "ratio": 0.5, "tags": ["x"], "gone": null});
        assert!(record.responds_to("name"));
        assert!(!record.responds_to("missing"));
        assert_eq!(Record::get(&record, "name"), Ok(CellValue::from("a")));
        assert_eq!(record.get_i64("value"), Ok(5));
        assert_eq!(record.get_f64("ratio"), Ok(0.5));
        assert_eq!(record.get_str("tags"), Ok("[\"x\"]".to_string()));
        assert_eq!(Record::get(&record, "gone"), Ok(CellValue::Missing));
        assert_eq!(record.get_i64("gone"), Err(ResolveError::missing("gone")));
    }

    #[test]
    fn missing_member_is_reported_before_call() {
        let record = json!({"name": "a"});
        assert_eq!(
            record.get_i64("value"),
            Err(ResolveError::missing("value"))
        );
    }

    #[test]
    fn wrong_type_is_a_hard_failure() {
        let record = json!({"value": "five"});
        let err = record.get_i64("value").expect_err("text is not an integer");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn non_object_json_has_no_members() {
        let record = json!([1, 2, 3]);
        assert!(!record.responds_to("len"));
        assert_eq!(Record::get(&record, "len"), Err(ResolveError::missing("len")));
    }

    #[test]
    fn cell_map_members() {
        let mut record = BTreeMap::new();
        record.insert("name".to_string(), CellValue::from("b"));
        assert!(record.responds_to("name"));
        assert_eq!(Record::get(&record, "name"), Ok(CellValue::from("b")));
        assert_eq!(
            Record::get(&record, "value"),
            Err(ResolveError::missing("value"))
        );
    }

    #[derive(Clone)]
    struct Patient {
        name: String,
        age: i64,
    }

    crate::impl_record!(Patient { name, age });

    #[test]
    fn macro_exposes_listed_fields() {
        let patient = Patient {
            name: "Ada".to_string(),
            age: 36,
        };
        assert!(patient.responds_to("name"));
        assert!(!patient.responds_to("email"));
        assert_eq!(patient.get_i64("age"), Ok(36));
        assert_eq!(patient.get_str("name"), Ok("Ada".to_string()));
    }
}
