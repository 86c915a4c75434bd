//! Task sequencing and guidance context for "what comes next" answers.

pub mod context;
pub mod sequence;

pub use context::{build_guidance_context, GuidanceContext};
pub use sequence::{
    first_tasks, is_last_task_in_sequence, next_tasks_after, GroupRank, GroupedTasks,
    SequenceEntry,
};
