//! Prompt assembly for the portal assistant.

use std::fmt::Write as _;

use crate::guidance::{GuidanceContext, SequenceEntry};

/// Standing instructions for the assistant.
pub const SYSTEM_PROMPT: &str = "You are the client portal assistant for a consulting firm. \
Answer the client's question about their project clearly and briefly. \
When project guidance is provided, use it to explain where the client is in the process \
and what they need to do next. Never invent tasks that are not listed. \
If you do not know, say so and suggest contacting the project team.";

fn describe(entry: &SequenceEntry) -> String {
    let mut line = format!("{} {}", entry.status.marker(), entry.title);
    if let Some(action) = &entry.action_type {
        let _ = write!(line, " (action: {action})");
    }
    if let Some(group) = &entry.group_name {
        let _ = write!(line, " [{group}]");
    }
    let _ = write!(line, " - {}", entry.status);
    line
}

/// Renders the guidance section injected into the user prompt.
#[must_use]
pub fn guidance_section(ctx: &GuidanceContext) -> String {
    let mut out = String::from("## Project guidance\n");
    if let Some(name) = &ctx.project_name {
        let _ = writeln!(out, "Project: {name}");
    }
    if let Some(kind) = &ctx.project_type {
        let _ = writeln!(out, "Type: {kind}");
    }
    if let Some(status) = &ctx.project_status {
        let _ = writeln!(out, "Status: {status}");
    }
    let _ = writeln!(out, "Progress: {} of {} tasks completed", ctx.completed_tasks, ctx.total_tasks);
    if ctx.is_all_tasks_completed {
        out.push_str("All tasks are complete.\n");
    }

    if !ctx.sequence.is_empty() {
        out.push_str("\nTask sequence:\n");
        for (i, entry) in ctx.sequence.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", i + 1, describe(entry));
        }
    }

    if let (Some(current), Some(index)) = (&ctx.current_task, ctx.current_task_index) {
        let _ = writeln!(out, "\nThe client is asking about step {}: {}", index + 1, current.title);
        if !ctx.previous_tasks.is_empty() {
            let _ = writeln!(out, "Completed before it: {}", titles(&ctx.previous_tasks));
        }
        if ctx.next_tasks.is_empty() {
            out.push_str("Nothing remains after this step.\n");
        } else {
            let _ = writeln!(out, "Still to do after it: {}", titles(&ctx.next_tasks));
        }
    } else {
        let upcoming: Vec<&SequenceEntry> =
            ctx.sequence.iter().filter(|e| !e.status.is_completed()).take(3).collect();
        if !upcoming.is_empty() {
            let names: Vec<&str> = upcoming.iter().map(|e| e.title.as_str()).collect();
            let _ = writeln!(out, "\nNext up: {}", names.join("; "));
        }
    }
    out
}

fn titles(entries: &[SequenceEntry]) -> String {
    entries.iter().map(|e| e.title.as_str()).collect::<Vec<_>>().join("; ")
}

/// Builds the user prompt. Without guidance the question is asked bare.
#[must_use]
pub fn user_prompt(question: &str, guidance: Option<&GuidanceContext>) -> String {
    match guidance {
        Some(ctx) => format!("{}\n## Question\n{}", guidance_section(ctx), question.trim()),
        None => format!("## Question\n{}", question.trim()),
    }
}
