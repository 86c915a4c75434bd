//! `portal show` command.

use std::fmt::Write as _;

use crate::context::ServiceContext;
use crate::domain::Task;
use crate::guidance::{build_guidance_context, GuidanceContext};

/// Execute the `show` command.
///
/// Prints the project header, progress, and the grouped task tree.
///
/// # Errors
///
/// Never fails today; an unavailable context is reported on stdout.
pub async fn run(ctx: &ServiceContext, project: &str) -> Result<(), String> {
    match build_guidance_context(ctx.records.as_ref(), project, None).await {
        Some(guidance) => print!("{}", render(&guidance)),
        None => println!("Guidance context unavailable for project {project}."),
    }
    Ok(())
}

fn task_line(out: &mut String, indent: &str, task: &Task) {
    let _ = write!(out, "{indent}{} {}", task.status.marker(), task.title);
    if let Some(action) = &task.action_type {
        let _ = write!(out, " ({action})");
    }
    out.push('\n');
}

/// Renders the detail card.
#[must_use]
pub fn render(ctx: &GuidanceContext) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} ===", ctx.project_name.as_deref().unwrap_or("Untitled project"));
    let _ = writeln!(out, "Type: {}", ctx.project_type.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "Status: {}", ctx.project_status.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "Progress: {}/{}", ctx.completed_tasks, ctx.total_tasks);

    if ctx.total_tasks == 0 {
        out.push_str("\nNo tasks yet.\n");
        return out;
    }

    for grouped in &ctx.groups {
        let _ = writeln!(out, "\n{} (#{})", grouped.group.name, grouped.group.group_order);
        if grouped.tasks.is_empty() {
            out.push_str("  (no tasks)\n");
        }
        for task in &grouped.tasks {
            task_line(&mut out, "  ", task);
        }
    }
    if !ctx.ungrouped_tasks.is_empty() {
        out.push_str("\nOther tasks\n");
        for task in &ctx.ungrouped_tasks {
            task_line(&mut out, "  ", task);
        }
    }

    if ctx.is_all_tasks_completed {
        out.push_str("\nAll tasks complete.\n");
    } else if let Some(next) = ctx.sequence.iter().find(|e| !e.status.is_completed()) {
        let _ = writeln!(out, "\nNext: {}", next.title);
    }
    out
}
