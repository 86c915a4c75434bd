//! Raw backend records and typed access to their `fields` mapping.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A single record as returned by the record API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Opaque backend record id (e.g. `"recA1b2C3"`).
    pub id: String,
    /// Field name to value mapping. Absent when the backend omits it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Map<String, Value>>,
}

impl Record {
    /// Creates a record with the given fields.
    #[must_use]
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self { id: id.into(), fields: Some(fields) }
    }

    /// Returns a field accessor, or `None` when the record carries no fields.
    #[must_use]
    pub fn fields(&self) -> Option<Fields<'_>> {
        self.fields.as_ref().map(|map| Fields { record_id: &self.id, map })
    }
}

/// A field value did not have the shape the portal expects.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("record {record_id}: field '{field}' {problem}")]
pub struct FieldError {
    /// Record the field belongs to.
    pub record_id: String,
    /// Field name.
    pub field: String,
    /// What was wrong with it.
    pub problem: String,
}

/// Borrowed view over a record's fields with typed getters.
///
/// Missing and `null` fields read as `None`; values of the wrong JSON type
/// are reported as [`FieldError`].
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    record_id: &'a str,
    map: &'a Map<String, Value>,
}

impl Fields<'_> {
    /// Reads a text field.
    ///
    /// Numbers are rendered as text, and single-element lookup arrays are
    /// unwrapped to their first string.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] for objects, booleans, or non-string arrays.
    pub fn text(&self, field: &str) -> Result<Option<String>, FieldError> {
        match self.map.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(Value::Array(items)) => match items.first() {
                None => Ok(None),
                Some(Value::String(s)) => Ok(Some(s.clone())),
                Some(_) => Err(self.error(field, "is an array of non-text values")),
            },
            Some(_) => Err(self.error(field, "is not text")),
        }
    }

    /// Reads a text field, treating blank strings as absent.
    ///
    /// # Errors
    ///
    /// See [`Fields::text`].
    pub fn non_empty_text(&self, field: &str) -> Result<Option<String>, FieldError> {
        Ok(self.text(field)?.filter(|s| !s.trim().is_empty()))
    }

    /// Reads an integer field.
    ///
    /// Whole floating point numbers and numeric strings are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] when the value is not a whole number.
    #[allow(clippy::cast_possible_truncation)]
    pub fn integer(&self, field: &str) -> Result<Option<i64>, FieldError> {
        match self.map.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => {
                if let Some(i) = n.as_i64() {
                    return Ok(Some(i));
                }
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => Ok(Some(f as i64)),
                    _ => Err(self.error(field, &format!("is not a whole number ({n})"))),
                }
            }
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => s
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| self.error(field, &format!("is not a whole number ({s:?})"))),
            Some(_) => Err(self.error(field, "is not a number")),
        }
    }

    /// Reads a linked-record field as a list of record ids.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] when the value is neither a string nor an
    /// array of strings.
    pub fn linked_ids(&self, field: &str) -> Result<Vec<String>, FieldError> {
        match self.map.get(field) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::String(s)) => Ok(vec![s.clone()]),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(String::from)
                        .ok_or_else(|| self.error(field, "contains a non-text link"))
                })
                .collect(),
            Some(_) => Err(self.error(field, "is not a linked record list")),
        }
    }

    fn error(&self, field: &str, problem: &str) -> FieldError {
        FieldError {
            record_id: self.record_id.to_string(),
            field: field.to_string(),
            problem: problem.to_string(),
        }
    }
}
