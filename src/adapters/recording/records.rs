//! Recording adapter for the `RecordStore` port.

use serde::Serialize;

use super::capture;
use crate::cassette::recorder::SharedRecorder;
use crate::ports::records::{RecordFuture, RecordStore};

const PORT: &str = "records";

/// Records record-store traffic while delegating to an inner store.
pub struct RecordingRecordStore {
    inner: Box<dyn RecordStore>,
    recorder: SharedRecorder,
}

impl RecordingRecordStore {
    /// Wraps `inner`, recording into `recorder`.
    pub fn new(inner: Box<dyn RecordStore>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct RecordIdInput {
    record_id: String,
}

#[derive(Serialize)]
struct ProjectScopeInput {
    project_id: String,
}

#[derive(Serialize)]
struct NoInput {}

impl RecordStore for RecordingRecordStore {
    fn get_project(&self, record_id: &str) -> RecordFuture<'_, Option<crate::domain::Record>> {
        let input = RecordIdInput { record_id: record_id.to_string() };
        Box::pin(async move {
            let result = self.inner.get_project(&input.record_id).await;
            capture(&self.recorder, PORT, "get_project", &input, &result);
            result
        })
    }

    fn list_projects(&self) -> RecordFuture<'_, Vec<crate::domain::Record>> {
        Box::pin(async move {
            let result = self.inner.list_projects().await;
            capture(&self.recorder, PORT, "list_projects", &NoInput {}, &result);
            result
        })
    }

    fn list_task_groups(&self, project_id: &str) -> RecordFuture<'_, Vec<crate::domain::Record>> {
        let input = ProjectScopeInput { project_id: project_id.to_string() };
        Box::pin(async move {
            let result = self.inner.list_task_groups(&input.project_id).await;
            capture(&self.recorder, PORT, "list_task_groups", &input, &result);
            result
        })
    }

    fn list_tasks(&self, project_id: &str) -> RecordFuture<'_, Vec<crate::domain::Record>> {
        let input = ProjectScopeInput { project_id: project_id.to_string() };
        Box::pin(async move {
            let result = self.inner.list_tasks(&input.project_id).await;
            capture(&self.recorder, PORT, "list_tasks", &input, &result);
            result
        })
    }
}
