//! Recording adapters: delegate to an inner port and capture every call.

pub mod llm;
pub mod records;

pub use llm::RecordingLlmClient;
pub use records::RecordingRecordStore;

use serde::Serialize;

use crate::cassette::recorder::SharedRecorder;

/// Appends one call and its result to the shared recorder.
///
/// A poisoned lock drops the interaction rather than failing the call.
pub(crate) fn capture<I, T, E>(
    recorder: &SharedRecorder,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    I: Serialize,
    T: Serialize,
    E: std::fmt::Display,
{
    match recorder.lock() {
        Ok(mut guard) => guard.record_result(port, method, input, result),
        Err(_) => tracing::warn!(port, method, "recorder lock poisoned; interaction not recorded"),
    }
}
