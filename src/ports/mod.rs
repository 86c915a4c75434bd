//! Port traits defining external boundaries.
//!
//! Each trait is a boundary between the portal core and an external
//! service: the record backend and the completion API. Implementations live
//! in `src/adapters/`.

pub mod llm;
pub mod records;

pub use llm::{CompletionFuture, CompletionRequest, CompletionResponse, LlmClient};
pub use records::{RecordFuture, RecordStore};
