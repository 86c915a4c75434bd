//! Live adapters talking to the real services.

pub mod llm;
pub mod records;

pub use llm::LiveLlmClient;
pub use records::{AirtableError, AirtableRecordStore};
