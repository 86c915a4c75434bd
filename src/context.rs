//! Service context bundling the port trait objects.

use std::path::Path;

use crate::adapters::live::{AirtableRecordStore, LiveLlmClient};
use crate::adapters::recording::{RecordingLlmClient, RecordingRecordStore};
use crate::adapters::replaying::{ReplayingLlmClient, ReplayingRecordStore};
use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::config::PortalConfig;
use crate::ports::llm::LlmClient;
use crate::ports::records::RecordStore;

/// Bundles every external boundary the portal talks to.
///
/// Constructors wire up live, recording, or replaying adapters; command
/// code only ever sees the traits.
pub struct ServiceContext {
    /// Record backend.
    pub records: Box<dyn RecordStore>,
    /// Assistant completion API.
    pub llm: Box<dyn LlmClient>,
}

impl ServiceContext {
    /// Creates a context from explicit port implementations.
    #[must_use]
    pub fn new(records: Box<dyn RecordStore>, llm: Box<dyn LlmClient>) -> Self {
        Self { records, llm }
    }

    /// Creates a context talking to the configured live services.
    #[must_use]
    pub fn live(config: &PortalConfig) -> Self {
        Self {
            records: Box::new(AirtableRecordStore::new(config.records.clone())),
            llm: Box::new(LiveLlmClient::new(config.assistant.api_key.clone())),
        }
    }

    /// Creates a live context that records every interaction into per-port
    /// cassettes under `dir`.
    ///
    /// Drop the context before calling [`RecordingSession::finish`].
    #[must_use]
    pub fn recording_at(config: &PortalConfig, dir: &Path) -> (Self, RecordingSession) {
        let session = RecordingSession::new(dir);
        let live = Self::live(config);
        let ctx = Self {
            records: Box::new(RecordingRecordStore::new(live.records, session.records.clone())),
            llm: Box::new(RecordingLlmClient::new(live.llm, session.llm.clone())),
        };
        (ctx, session)
    }

    /// Creates a context replaying a cassette. Both ports read from the same
    /// cassette, each consuming only its own interactions.
    #[must_use]
    pub fn replaying_cassette(cassette: &Cassette) -> Self {
        let replayer = CassetteReplayer::new(cassette).shared();
        Self {
            records: Box::new(ReplayingRecordStore::new(replayer.clone())),
            llm: Box::new(ReplayingLlmClient::new(replayer)),
        }
    }

    /// Creates a replaying context from a cassette file, or from every
    /// `*.cassette.yaml` file when `path` is a recording directory.
    ///
    /// # Errors
    ///
    /// Returns an error if a cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        if !path.is_dir() {
            return Ok(Self::replaying_cassette(&Cassette::load(path)?));
        }

        let entries = std::fs::read_dir(path)
            .map_err(|e| format!("Failed to list cassette directory {}: {e}", path.display()))?;
        let mut files: Vec<_> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|p| p.to_string_lossy().ends_with(".cassette.yaml"))
            .collect();
        files.sort();

        let mut merged: Option<Cassette> = None;
        for file in files {
            let cassette = Cassette::load(&file)?;
            match merged.as_mut() {
                Some(m) => m.interactions.extend(cassette.interactions),
                None => merged = Some(cassette),
            }
        }
        let cassette =
            merged.ok_or_else(|| format!("No cassette files found in {}", path.display()))?;
        Ok(Self::replaying_cassette(&cassette))
    }

    /// Creates a context where every call fails. Useful as a base for tests
    /// that replace one port.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self {
            records: Box::new(ReplayingRecordStore::unconfigured()),
            llm: Box::new(ReplayingLlmClient::unconfigured()),
        }
    }
}
