//! Replaying adapters serving recorded interactions from a cassette.

pub mod llm;
pub mod records;

pub use llm::ReplayingLlmClient;
pub use records::ReplayingRecordStore;
