//! `portal guide` command.

use crate::context::ServiceContext;
use crate::guidance::build_guidance_context;

/// Execute the `guide` command.
///
/// Prints the guidance context as pretty JSON, or `null` when it is
/// unavailable.
///
/// # Errors
///
/// Returns an error string if the context cannot be serialized.
pub async fn run(ctx: &ServiceContext, project: &str, task: Option<&str>) -> Result<(), String> {
    println!("{}", render(ctx, project, task).await?);
    Ok(())
}

/// Builds the guidance context and serializes it.
///
/// # Errors
///
/// Returns an error string if the context cannot be serialized.
pub async fn render(ctx: &ServiceContext, project: &str, task: Option<&str>) -> Result<String, String> {
    let guidance = build_guidance_context(ctx.records.as_ref(), project, task).await;
    serde_json::to_string_pretty(&guidance).map_err(|e| format!("Failed to serialize guidance: {e}"))
}
