//! Recording session: one cassette per port in a shared directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::recorder::{CassetteRecorder, SharedRecorder};

/// Per-port recorders for one recorded command run.
pub struct RecordingSession {
    /// Recorder for the record store port.
    pub records: SharedRecorder,
    /// Recorder for the completion port.
    pub llm: SharedRecorder,
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Creates a session writing `records.cassette.yaml` and
    /// `llm.cassette.yaml` into `output_dir` when finished.
    #[must_use]
    pub fn new(output_dir: &Path) -> Self {
        let make = |port: &str| {
            CassetteRecorder::new(output_dir.join(format!("{port}.cassette.yaml")), port).shared()
        };
        Self { records: make("records"), llm: make("llm"), output_dir: output_dir.to_path_buf() }
    }

    /// Writes every port cassette. Ports that saw no traffic are skipped.
    ///
    /// All adapters holding the recorders must have been dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if a recorder is still shared or a file cannot be
    /// written.
    pub fn finish(self) -> Result<PathBuf, String> {
        for (port, shared) in [("records", self.records), ("llm", self.llm)] {
            let recorder = Arc::try_unwrap(shared)
                .map_err(|_| format!("Recording adapter for {port} still has references"))?
                .into_inner()
                .map_err(|e| format!("Recorder lock for {port} poisoned: {e}"))?;
            if recorder.is_empty() {
                continue;
            }
            recorder.finish().map_err(|e| format!("Failed to write {port} cassette: {e}"))?;
        }
        Ok(self.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn finish_writes_only_ports_with_traffic() {
        let dir = std::env::temp_dir().join("portal_session_finish");
        let _ = std::fs::remove_dir_all(&dir);

        let session = RecordingSession::new(&dir);
        session.records.lock().unwrap().record(
            "records",
            "list_projects",
            json!({}),
            json!({"Ok": []}),
        );
        let out = session.finish().unwrap();

        assert_eq!(out, dir);
        assert!(dir.join("records.cassette.yaml").exists());
        assert!(!dir.join("llm.cassette.yaml").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn finish_fails_while_an_adapter_holds_a_recorder() {
        let dir = std::env::temp_dir().join("portal_session_still_shared");
        let session = RecordingSession::new(&dir);
        let _held = Arc::clone(&session.llm);
        let err = session.finish().unwrap_err();
        assert!(err.contains("still has references"));
    }
}
