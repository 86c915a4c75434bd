//! Captures port interactions and writes them as a cassette.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

use super::format::{Cassette, Interaction};

/// Recorder shared between the recording adapters of one session.
pub type SharedRecorder = Arc<Mutex<CassetteRecorder>>;

/// Accumulates interactions in memory until [`CassetteRecorder::finish`].
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    name: String,
    interactions: Vec<Interaction>,
}

impl CassetteRecorder {
    /// Creates a recorder that will write to `path`.
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self { path: path.into(), name: name.into(), interactions: Vec::new() }
    }

    /// Wraps the recorder for sharing between adapters.
    #[must_use]
    pub fn shared(self) -> SharedRecorder {
        Arc::new(Mutex::new(self))
    }

    /// Appends an interaction with the next sequence number.
    pub fn record(
        &mut self,
        port: impl Into<String>,
        method: impl Into<String>,
        input: Value,
        output: Value,
    ) {
        let seq = self.interactions.len() as u64;
        self.interactions.push(Interaction {
            seq,
            port: port.into(),
            method: method.into(),
            input,
            output,
        });
    }

    /// Records a fallible call using the `{"Ok": v}` / `{"Err": msg}` convention.
    ///
    /// Values that fail to serialize are stored as `null` so that a recording
    /// problem never changes what the caller sees.
    pub fn record_result<I, T, E>(&mut self, port: &str, method: &str, input: &I, result: &Result<T, E>)
    where
        I: Serialize,
        T: Serialize,
        E: std::fmt::Display,
    {
        let input = serde_json::to_value(input).unwrap_or(Value::Null);
        let output = match result {
            Ok(value) => json!({ "Ok": serde_json::to_value(value).unwrap_or(Value::Null) }),
            Err(err) => json!({ "Err": err.to_string() }),
        };
        self.record(port, method, input, output);
    }

    /// Number of interactions recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    /// True when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    /// Builds the cassette without writing it.
    #[must_use]
    pub fn into_cassette(self) -> Cassette {
        Cassette {
            name: self.name,
            recorded_at: Utc::now(),
            portal_version: env!("CARGO_PKG_VERSION").to_string(),
            interactions: self.interactions,
        }
    }

    /// Writes the cassette YAML to disk, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn finish(self) -> Result<PathBuf, std::io::Error> {
        let path = self.path.clone();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(&self.into_cassette()).map_err(std::io::Error::other)?;
        std::fs::write(&path, yaml)?;
        Ok(path)
    }
}
