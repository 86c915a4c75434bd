//! `portal ask` command.

use crate::assistant;
use crate::config::AssistantSettings;
use crate::context::ServiceContext;

/// Execute the `ask` command and print the assistant's answer.
///
/// # Errors
///
/// Returns an error string if the question is blank or the assistant call
/// fails.
pub async fn run(
    ctx: &ServiceContext,
    settings: &AssistantSettings,
    project: &str,
    task: Option<&str>,
    question: &str,
) -> Result<(), String> {
    let answer = assistant::ask(ctx, settings, project, task, question).await?;
    println!("{answer}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn assistant_failure_propagates() {
        let ctx = ServiceContext::unconfigured();
        let err = run(&ctx, &AssistantSettings::default(), "recP1", None, "Hi").await.unwrap_err();
        assert!(err.contains("no cassette loaded"));
    }
}
