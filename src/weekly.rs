//! Weekly update digest.
//!
//! Plain-text summary of where a project stands, sent to clients once a
//! week.

use std::fmt::Write as _;

use chrono::NaiveDate;

use crate::domain::TaskStatus;
use crate::guidance::{GuidanceContext, SequenceEntry};

/// Number of upcoming tasks listed in the digest.
pub const UPCOMING_LIMIT: usize = 3;

/// Renders the digest for `ctx` dated `date`.
#[must_use]
pub fn render(ctx: &GuidanceContext, date: NaiveDate) -> String {
    let mut out = String::new();
    let name = ctx.project_name.as_deref().unwrap_or("Your project");
    let _ = writeln!(out, "Weekly update: {name}");
    let _ = writeln!(out, "Week of {}", date.format("%B %-d, %Y"));
    if let Some(status) = &ctx.project_status {
        let _ = writeln!(out, "Status: {status}");
    }
    let _ = writeln!(out, "Progress: {}/{} tasks completed ({}%)", ctx.completed_tasks, ctx.total_tasks, percent(ctx));

    let completed: Vec<&SequenceEntry> = ctx.sequence.iter().filter(|e| e.status.is_completed()).collect();
    let in_progress: Vec<&SequenceEntry> =
        ctx.sequence.iter().filter(|e| e.status == TaskStatus::InProgress).collect();
    let upcoming: Vec<&SequenceEntry> = ctx
        .sequence
        .iter()
        .filter(|e| !e.status.is_completed() && e.status != TaskStatus::InProgress)
        .take(UPCOMING_LIMIT)
        .collect();

    section(&mut out, "Completed", &completed);
    section(&mut out, "In progress", &in_progress);
    section(&mut out, "Coming up", &upcoming);

    if ctx.is_all_tasks_completed {
        out.push_str("\nAll tasks are complete. Thank you!\n");
    }
    out
}

fn percent(ctx: &GuidanceContext) -> usize {
    if ctx.total_tasks == 0 {
        0
    } else {
        ctx.completed_tasks * 100 / ctx.total_tasks
    }
}

fn section(out: &mut String, heading: &str, entries: &[&SequenceEntry]) {
    let _ = writeln!(out, "\n{heading}:");
    if entries.is_empty() {
        out.push_str("  (none)\n");
        return;
    }
    for entry in entries {
        match &entry.group_name {
            Some(group) => {
                let _ = writeln!(out, "  - {} ({group})", entry.title);
            }
            None => {
                let _ = writeln!(out, "  - {}", entry.title);
            }
        }
    }
}
