//! Task sequence derivation.
//!
//! Tasks are flattened into one globally ordered list: by group order
//! (ungrouped tasks last), then by task order, then by task record id so
//! that ties never depend on the order the backend happened to return.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::{Task, TaskGroup, TaskStatus};

/// Primary sort key of a sequence entry.
///
/// Every grouped rank sorts before [`GroupRank::Ungrouped`]. Serialized as
/// the group order, or `null` for ungrouped tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupRank {
    /// Task belongs to a group with this order.
    Grouped(i64),
    /// Task has no group.
    Ungrouped,
}

impl GroupRank {
    /// The group order, if grouped.
    #[must_use]
    pub fn order(self) -> Option<i64> {
        match self {
            Self::Grouped(order) => Some(order),
            Self::Ungrouped => None,
        }
    }
}

impl Serialize for GroupRank {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.order().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GroupRank {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<i64>::deserialize(deserializer)?.map_or(Self::Ungrouped, Self::Grouped))
    }
}

/// One task in the flattened sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceEntry {
    /// Task record id.
    pub task_id: String,
    /// Task title.
    pub title: String,
    /// Name of the owning group, `None` when ungrouped.
    pub group_name: Option<String>,
    /// Owning group's rank.
    pub group_order: GroupRank,
    /// Order within the group.
    pub task_order: i64,
    /// Current status.
    pub status: TaskStatus,
    /// What the client must do.
    pub action_type: Option<String>,
}

impl SequenceEntry {
    fn from_task(task: &Task, group: Option<&TaskGroup>) -> Self {
        Self {
            task_id: task.id.clone(),
            title: task.title.clone(),
            group_name: group.map(|g| g.name.clone()),
            group_order: group.map_or(GroupRank::Ungrouped, |g| GroupRank::Grouped(g.group_order)),
            task_order: task.task_order,
            status: task.status.clone(),
            action_type: task.action_type.clone(),
        }
    }

    fn sequence_cmp(&self, other: &Self) -> Ordering {
        self.group_order
            .cmp(&other.group_order)
            .then_with(|| self.task_order.cmp(&other.task_order))
            .then_with(|| self.task_id.cmp(&other.task_id))
    }
}

/// A group together with its sorted member tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedTasks {
    /// The group.
    pub group: TaskGroup,
    /// Member tasks sorted by task order.
    pub tasks: Vec<Task>,
}

/// Tasks split into their groups plus a residual ungrouped list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    /// Groups sorted by group order, each with sorted members.
    pub groups: Vec<GroupedTasks>,
    /// Tasks with no group (or a group that was not fetched), sorted.
    pub ungrouped: Vec<Task>,
}

/// Splits tasks by group and sorts both levels.
///
/// A task pointing at a group id that is not among `groups` is treated as
/// ungrouped so that it still appears in the sequence.
#[must_use]
pub fn partition(mut groups: Vec<TaskGroup>, tasks: Vec<Task>) -> Partition {
    groups.sort_by(|a, b| a.group_order.cmp(&b.group_order).then_with(|| a.id.cmp(&b.id)));

    let mut members: HashMap<String, Vec<Task>> =
        groups.iter().map(|g| (g.id.clone(), Vec::new())).collect();
    let mut ungrouped = Vec::new();
    for task in tasks {
        match task.group_id.as_ref().and_then(|id| members.get_mut(id)) {
            Some(bucket) => bucket.push(task),
            None => ungrouped.push(task),
        }
    }

    let by_task_order = |a: &Task, b: &Task| a.task_order.cmp(&b.task_order).then_with(|| a.id.cmp(&b.id));
    ungrouped.sort_by(by_task_order);

    let groups = groups
        .into_iter()
        .map(|group| {
            let mut tasks = members.remove(&group.id).unwrap_or_default();
            tasks.sort_by(by_task_order);
            GroupedTasks { group, tasks }
        })
        .collect();

    Partition { groups, ungrouped }
}

/// Flattens a partition into the global task sequence.
///
/// Groups are walked in order and the ungrouped tail is appended. The result
/// is then stably re-sorted on the full key, which only moves entries when
/// two groups share a group order.
#[must_use]
pub fn flatten(partition: &Partition) -> Vec<SequenceEntry> {
    let mut sequence: Vec<SequenceEntry> = partition
        .groups
        .iter()
        .flat_map(|g| g.tasks.iter().map(move |t| SequenceEntry::from_task(t, Some(&g.group))))
        .chain(partition.ungrouped.iter().map(|t| SequenceEntry::from_task(t, None)))
        .collect();
    sequence.sort_by(SequenceEntry::sequence_cmp);
    sequence
}

/// Position of a task in the sequence.
#[must_use]
pub fn position_of(task_id: &str, sequence: &[SequenceEntry]) -> Option<usize> {
    sequence.iter().position(|e| e.task_id == task_id)
}

/// Entries tied for earliest: the minimum group rank, then the minimum task
/// order within it.
#[must_use]
pub fn first_tasks(sequence: &[SequenceEntry]) -> Vec<&SequenceEntry> {
    let Some(min_rank) = sequence.iter().map(|e| e.group_order).min() else {
        return Vec::new();
    };
    let in_first_group: Vec<&SequenceEntry> =
        sequence.iter().filter(|e| e.group_order == min_rank).collect();
    let min_order = in_first_group.iter().map(|e| e.task_order).min().unwrap_or_default();
    in_first_group.into_iter().filter(|e| e.task_order == min_order).collect()
}

/// Not-completed entries after `task_id`. Empty when the task is unknown.
#[must_use]
pub fn next_tasks_after<'a>(task_id: &str, sequence: &'a [SequenceEntry]) -> Vec<&'a SequenceEntry> {
    position_of(task_id, sequence).map_or_else(Vec::new, |index| {
        sequence[index + 1..].iter().filter(|e| !e.status.is_completed()).collect()
    })
}

/// Completed entries before `index`.
#[must_use]
pub fn completed_before(index: usize, sequence: &[SequenceEntry]) -> Vec<&SequenceEntry> {
    sequence[..index.min(sequence.len())].iter().filter(|e| e.status.is_completed()).collect()
}

/// True when exactly one entry is not completed and it is `task_id`.
#[must_use]
pub fn is_last_task_in_sequence(task_id: &str, sequence: &[SequenceEntry]) -> bool {
    let mut remaining = sequence.iter().filter(|e| !e.status.is_completed());
    match (remaining.next(), remaining.next()) {
        (Some(only), None) => only.task_id == task_id,
        _ => false,
    }
}
