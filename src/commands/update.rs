//! `portal update` command.

use chrono::{Local, NaiveDate};

use crate::context::ServiceContext;
use crate::guidance::build_guidance_context;
use crate::weekly;

/// Execute the `update` command.
///
/// Prints the weekly digest dated `date`, or today.
///
/// # Errors
///
/// Returns an error string when the project's guidance context is
/// unavailable.
pub async fn run(ctx: &ServiceContext, project: &str, date: Option<NaiveDate>) -> Result<(), String> {
    let guidance = build_guidance_context(ctx.records.as_ref(), project, None)
        .await
        .ok_or_else(|| format!("Cannot build weekly update: project {project} is unavailable"))?;
    let date = date.unwrap_or_else(|| Local::now().date_naive());
    print!("{}", weekly::render(&guidance, date));
    Ok(())
}
