//! Record store port for the relational-record backend.

use std::error::Error;
use std::future::Future;
use std::pin::Pin;

use crate::domain::Record;

/// Boxed future returned by [`RecordStore`] methods, keeping the trait
/// dyn-compatible.
pub type RecordFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, Box<dyn Error + Send + Sync>>> + Send + 'a>>;

/// Wraps an already-computed result in a [`RecordFuture`].
pub fn ready<T: Send + 'static>(
    result: Result<T, Box<dyn Error + Send + Sync>>,
) -> RecordFuture<'static, T> {
    Box::pin(async move { result })
}

/// Reads projects, task groups, and tasks from the backend.
///
/// Related-record queries are scoped by the human-readable project
/// identifier, not by the project's record id.
pub trait RecordStore: Send + Sync {
    /// Fetches a project by record id. `Ok(None)` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    fn get_project(&self, record_id: &str) -> RecordFuture<'_, Option<Record>>;

    /// Lists every project.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    fn list_projects(&self) -> RecordFuture<'_, Vec<Record>>;

    /// Lists task groups belonging to the project identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    fn list_task_groups(&self, project_id: &str) -> RecordFuture<'_, Vec<Record>>;

    /// Lists tasks belonging to the project identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    fn list_tasks(&self, project_id: &str) -> RecordFuture<'_, Vec<Record>>;
}
