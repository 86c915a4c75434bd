//! Project records.

use serde::{Deserialize, Serialize};

use super::record::{FieldError, Record};

/// Field names on the projects table.
pub mod fields {
    /// Human-readable project identifier. The same field scopes the task
    /// group and task tables.
    pub const PROJECT_ID: &str = "Project ID";
    /// Display name.
    pub const NAME: &str = "Project Name";
    /// Engagement type (e.g. "Audit", "Implementation").
    pub const TYPE: &str = "Project Type";
    /// Overall project status.
    pub const STATUS: &str = "Status";
}

/// A client project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Opaque backend record id.
    pub record_id: String,
    /// Human-readable project identifier.
    pub project_id: String,
    /// Display name.
    pub name: Option<String>,
    /// Engagement type.
    pub project_type: Option<String>,
    /// Overall status.
    pub status: Option<String>,
}

impl Project {
    /// Parses a project record.
    ///
    /// Returns `Ok(None)` when the record has no fields or no project
    /// identifier, since nothing can be scoped to such a project.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] when a field has an unexpected shape.
    pub fn from_record(record: &Record) -> Result<Option<Self>, FieldError> {
        let Some(f) = record.fields() else {
            return Ok(None);
        };
        let Some(project_id) = f.non_empty_text(fields::PROJECT_ID)? else {
            return Ok(None);
        };
        Ok(Some(Self {
            record_id: record.id.clone(),
            project_id,
            name: f.non_empty_text(fields::NAME)?,
            project_type: f.non_empty_text(fields::TYPE)?,
            status: f.non_empty_text(fields::STATUS)?,
        }))
    }

    /// Name for display, falling back to the project identifier.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.project_id)
    }
}
