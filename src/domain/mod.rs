//! Portal domain: projects, task groups, tasks, and the raw records they
//! are parsed from.

pub mod project;
pub mod record;
pub mod task;

pub use project::Project;
pub use record::{FieldError, Fields, Record};
pub use task::{Task, TaskGroup, TaskStatus};
