//! Guidance context assembly.
//!
//! Builds the summary an assistant uses to answer "where is the client in
//! the process": project facts, completion counts, the grouped task tree,
//! the flattened sequence, and the neighbourhood of one highlighted task.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::sequence::{self, GroupedTasks, SequenceEntry};
use crate::domain::{Project, Task, TaskGroup};
use crate::ports::RecordStore;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Derived summary of a project's progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuidanceContext {
    /// Engagement type.
    pub project_type: Option<String>,
    /// Overall project status.
    pub project_status: Option<String>,
    /// Project display name.
    pub project_name: Option<String>,
    /// Number of tasks in the project.
    pub total_tasks: usize,
    /// Number of tasks whose status is exactly `Completed`.
    pub completed_tasks: usize,
    /// True when there is at least one task and all are completed.
    pub is_all_tasks_completed: bool,
    /// Groups in order with their sorted tasks.
    pub groups: Vec<GroupedTasks>,
    /// Tasks without a group, sorted.
    pub ungrouped_tasks: Vec<Task>,
    /// All tasks in global order.
    pub sequence: Vec<SequenceEntry>,
    /// The highlighted task, when requested and found.
    pub current_task: Option<SequenceEntry>,
    /// Index of the highlighted task in `sequence`.
    pub current_task_index: Option<usize>,
    /// Completed tasks before the highlighted one.
    pub previous_tasks: Vec<SequenceEntry>,
    /// Not-completed tasks after the highlighted one.
    pub next_tasks: Vec<SequenceEntry>,
}

impl GuidanceContext {
    /// Assembles the context from already-fetched data.
    #[must_use]
    pub fn assemble(
        project: &Project,
        groups: Vec<TaskGroup>,
        tasks: Vec<Task>,
        task_id: Option<&str>,
    ) -> Self {
        let total_tasks = tasks.len();
        let completed_tasks = tasks.iter().filter(|t| t.status.is_completed()).count();

        let partition = sequence::partition(groups, tasks);
        let sequence = sequence::flatten(&partition);

        let current_task_index = task_id.and_then(|id| sequence::position_of(id, &sequence));
        let (current_task, previous_tasks, next_tasks) = match current_task_index {
            Some(index) => {
                let current = &sequence[index];
                (
                    Some(current.clone()),
                    sequence::completed_before(index, &sequence).into_iter().cloned().collect(),
                    sequence::next_tasks_after(&current.task_id, &sequence)
                        .into_iter()
                        .cloned()
                        .collect(),
                )
            }
            None => (None, Vec::new(), Vec::new()),
        };

        Self {
            project_type: project.project_type.clone(),
            project_status: project.status.clone(),
            project_name: project.name.clone(),
            total_tasks,
            completed_tasks,
            is_all_tasks_completed: total_tasks > 0 && completed_tasks == total_tasks,
            groups: partition.groups,
            ungrouped_tasks: partition.ungrouped,
            sequence,
            current_task,
            current_task_index,
            previous_tasks,
            next_tasks,
        }
    }

    /// Tasks tied for earliest in the sequence.
    #[must_use]
    pub fn first_tasks(&self) -> Vec<&SequenceEntry> {
        sequence::first_tasks(&self.sequence)
    }

    /// Whether `task_id` is the only task left to complete.
    #[must_use]
    pub fn is_last_task(&self, task_id: &str) -> bool {
        sequence::is_last_task_in_sequence(task_id, &self.sequence)
    }
}

/// Fetches a project with its groups and tasks and builds its guidance
/// context.
///
/// Returns `None` when the context is unavailable: the project does not
/// exist, has no fields or identifier, or any fetch or parse fails. Callers
/// treat `None` as "no guidance" and carry on without it.
pub async fn build_guidance_context(
    store: &dyn RecordStore,
    project_record_id: &str,
    task_id: Option<&str>,
) -> Option<GuidanceContext> {
    match try_build(store, project_record_id, task_id).await {
        Ok(Some(context)) => Some(context),
        Ok(None) => {
            warn!(project = project_record_id, "guidance context unavailable: project not found");
            None
        }
        Err(err) => {
            warn!(project = project_record_id, error = %err, "guidance context unavailable");
            None
        }
    }
}

async fn try_build(
    store: &dyn RecordStore,
    project_record_id: &str,
    task_id: Option<&str>,
) -> Result<Option<GuidanceContext>, BoxError> {
    let Some(record) = store.get_project(project_record_id).await? else {
        return Ok(None);
    };
    let Some(project) = Project::from_record(&record)? else {
        return Ok(None);
    };

    let (group_records, task_records) = tokio::try_join!(
        store.list_task_groups(&project.project_id),
        store.list_tasks(&project.project_id),
    )?;
    debug!(
        project = %project.project_id,
        groups = group_records.len(),
        tasks = task_records.len(),
        "fetched project records"
    );

    let groups = group_records.iter().map(TaskGroup::from_record).collect::<Result<Vec<_>, _>>()?;
    let tasks = task_records.iter().map(Task::from_record).collect::<Result<Vec<_>, _>>()?;

    Ok(Some(GuidanceContext::assemble(&project, groups, tasks, task_id)))
}
