//! Serves recorded interactions back in order.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use super::format::{Cassette, Interaction};

/// Replayer shared between the replaying adapters of one context.
pub type SharedReplayer = Arc<Mutex<CassetteReplayer>>;

/// Why a recorded interaction could not be served.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReplayError {
    /// The cassette never recorded this call.
    #[error("cassette has no interactions for {port}::{method} (recorded: [{available}])")]
    Unrecorded {
        /// Requested port.
        port: String,
        /// Requested method.
        method: String,
        /// Comma separated `port::method` pairs that are recorded.
        available: String,
    },

    /// Every recorded interaction for this call was already served.
    #[error("cassette exhausted: all {count} interactions for {port}::{method} were consumed")]
    Exhausted {
        /// Requested port.
        port: String,
        /// Requested method.
        method: String,
        /// How many were recorded.
        count: usize,
    },

    /// The recorded output does not have the expected shape.
    #[error("recorded output for {port}::{method} is malformed: {reason}")]
    Malformed {
        /// Requested port.
        port: String,
        /// Requested method.
        method: String,
        /// Decoding failure.
        reason: String,
    },
}

/// Queues interactions per `port::method` and serves them in recording order.
#[derive(Debug, Default)]
pub struct CassetteReplayer {
    queues: HashMap<(String, String), VecDeque<Interaction>>,
    served: HashMap<(String, String), usize>,
}

impl CassetteReplayer {
    /// Creates a replayer over every interaction in the cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<(String, String), VecDeque<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction.clone());
        }
        Self { queues, served: HashMap::new() }
    }

    /// Wraps the replayer for sharing between adapters.
    #[must_use]
    pub fn shared(self) -> SharedReplayer {
        Arc::new(Mutex::new(self))
    }

    /// Takes the next recorded interaction for `port::method`.
    ///
    /// A differing input is logged but does not fail the replay; the
    /// recording order is authoritative.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError`] when no interaction is left for the call.
    pub fn next_output(&mut self, port: &str, method: &str, input: &Value) -> Result<Value, ReplayError> {
        let key = (port.to_string(), method.to_string());
        let Some(queue) = self.queues.get_mut(&key) else {
            let mut available: Vec<String> =
                self.queues.keys().map(|(p, m)| format!("{p}::{m}")).collect();
            available.sort();
            return Err(ReplayError::Unrecorded {
                port: key.0,
                method: key.1,
                available: available.join(", "),
            });
        };
        let served = self.served.entry(key.clone()).or_default();
        let Some(interaction) = queue.pop_front() else {
            return Err(ReplayError::Exhausted { port: key.0, method: key.1, count: *served });
        };
        *served += 1;

        if !input.is_null() && !interaction.input.is_null() && interaction.input != *input {
            tracing::warn!(
                port,
                method,
                seq = interaction.seq,
                recorded = %interaction.input,
                actual = %input,
                "replayed call differs from recording"
            );
        }
        Ok(interaction.output)
    }
}

/// Decodes a recorded `{"Ok": v}` / `{"Err": msg}` output.
///
/// # Errors
///
/// The outer error is a replay problem (missing or malformed recording).
/// The inner `Result` is what the port originally returned.
pub fn decode_result<T: DeserializeOwned>(
    port: &str,
    method: &str,
    output: Value,
) -> Result<Result<T, String>, ReplayError> {
    let malformed = |reason: String| ReplayError::Malformed {
        port: port.to_string(),
        method: method.to_string(),
        reason,
    };
    let Value::Object(mut map) = output else {
        return Err(malformed("expected an object with Ok or Err".to_string()));
    };
    if let Some(ok) = map.remove("Ok") {
        return serde_json::from_value(ok).map(Ok).map_err(|e| malformed(e.to_string()));
    }
    match map.remove("Err") {
        Some(Value::String(message)) => Ok(Err(message)),
        Some(other) => Ok(Err(other.to_string())),
        None => Err(malformed("missing Ok or Err key".to_string())),
    }
}

/// Serves the next interaction and decodes it into the port's result type.
///
/// Replay failures and recorded errors both surface as the port error.
///
/// # Errors
///
/// Returns the recorded error message, or a description of the replay
/// failure.
pub fn replay<T: DeserializeOwned>(
    replayer: Option<&SharedReplayer>,
    port: &str,
    method: &str,
    input: &Value,
) -> Result<T, Box<dyn std::error::Error + Send + Sync>> {
    let Some(replayer) = replayer else {
        return Err(format!("{port} port has no cassette loaded").into());
    };
    let output = {
        let mut guard = replayer.lock().map_err(|_| format!("{port} replayer lock poisoned"))?;
        guard.next_output(port, method, input)?
    };
    decode_result(port, method, output)?.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn cassette(interactions: Vec<(&str, &str, Value, Value)>) -> Cassette {
        Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            portal_version: "0.1.0".into(),
            interactions: interactions
                .into_iter()
                .enumerate()
                .map(|(seq, (port, method, input, output))| Interaction {
                    seq: seq as u64,
                    port: port.into(),
                    method: method.into(),
                    input,
                    output,
                })
                .collect(),
        }
    }

    #[test]
    fn serves_each_method_in_recording_order() {
        let mut replayer = CassetteReplayer::new(&cassette(vec![
            ("records", "list_tasks", json!({"project_id": "A"}), json!({"Ok": [1]})),
            ("records", "list_task_groups", json!({"project_id": "A"}), json!({"Ok": [2]})),
            ("records", "list_tasks", json!({"project_id": "B"}), json!({"Ok": [3]})),
        ]));

        let groups = replayer.next_output("records", "list_task_groups", &Value::Null).unwrap();
        assert_eq!(groups, json!({"Ok": [2]}));
        let first = replayer.next_output("records", "list_tasks", &json!({"project_id": "A"})).unwrap();
        assert_eq!(first, json!({"Ok": [1]}));
        let second = replayer.next_output("records", "list_tasks", &Value::Null).unwrap();
        assert_eq!(second, json!({"Ok": [3]}));
    }

    #[test]
    fn exhausted_queue_is_an_error() {
        let mut replayer =
            CassetteReplayer::new(&cassette(vec![("llm", "complete", json!({}), json!({"Ok": 1}))]));
        replayer.next_output("llm", "complete", &Value::Null).unwrap();
        let err = replayer.next_output("llm", "complete", &Value::Null).unwrap_err();
        assert!(matches!(err, ReplayError::Exhausted { count: 1, .. }));
    }

    #[test]
    fn unrecorded_call_lists_what_is_available() {
        let mut replayer =
            CassetteReplayer::new(&cassette(vec![("llm", "complete", json!({}), json!({"Ok": 1}))]));
        let err = replayer.next_output("records", "get_project", &Value::Null).unwrap_err();
        assert!(err.to_string().contains("llm::complete"));
    }

    #[test]
    fn decode_result_distinguishes_recorded_errors() {
        let ok: Result<u32, String> = decode_result("p", "m", json!({"Ok": 4})).unwrap();
        assert_eq!(ok, Ok(4));
        let err: Result<u32, String> = decode_result("p", "m", json!({"Err": "nope"})).unwrap();
        assert_eq!(err, Err("nope".to_string()));
        assert!(decode_result::<u32>("p", "m", json!([])).is_err());
        assert!(decode_result::<u32>("p", "m", json!({"Ok": "four"})).is_err());
    }

    #[test]
    fn replay_without_cassette_fails_cleanly() {
        let result: Result<u32, _> = replay(None, "llm", "complete", &Value::Null);
        assert!(result.unwrap_err().to_string().contains("no cassette loaded"));
    }
}
