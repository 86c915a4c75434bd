//! Replaying adapter for the `RecordStore` port.

use serde_json::json;

use crate::cassette::replayer::{replay, SharedReplayer};
use crate::domain::Record;
use crate::ports::records::{ready, RecordFuture, RecordStore};

const PORT: &str = "records";

/// Serves recorded record-store results.
pub struct ReplayingRecordStore {
    replayer: Option<SharedReplayer>,
}

impl ReplayingRecordStore {
    /// Creates a store backed by the given replayer.
    #[must_use]
    pub fn new(replayer: SharedReplayer) -> Self {
        Self { replayer: Some(replayer) }
    }

    /// Creates a store with no cassette; every call fails.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self { replayer: None }
    }
}

impl RecordStore for ReplayingRecordStore {
    fn get_project(&self, record_id: &str) -> RecordFuture<'_, Option<Record>> {
        ready(replay(self.replayer.as_ref(), PORT, "get_project", &json!({ "record_id": record_id })))
    }

    fn list_projects(&self) -> RecordFuture<'_, Vec<Record>> {
        ready(replay(self.replayer.as_ref(), PORT, "list_projects", &json!({})))
    }

    fn list_task_groups(&self, project_id: &str) -> RecordFuture<'_, Vec<Record>> {
        ready(replay(self.replayer.as_ref(), PORT, "list_task_groups", &json!({ "project_id": project_id })))
    }

    fn list_tasks(&self, project_id: &str) -> RecordFuture<'_, Vec<Record>> {
        ready(replay(self.replayer.as_ref(), PORT, "list_tasks", &json!({ "project_id": project_id })))
    }
}
