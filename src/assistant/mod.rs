//! Portal assistant: answers client questions with the project's guidance
//! context in the prompt.

pub mod prompt;

use tracing::{debug, info};

use crate::config::AssistantSettings;
use crate::context::ServiceContext;
use crate::guidance::build_guidance_context;
use crate::ports::CompletionRequest;

/// Asks the assistant a question about a project.
///
/// Guidance is built first; when it is unavailable the question is still
/// sent, just without the guidance section.
///
/// # Errors
///
/// Returns an error if the question is blank or the completion fails.
pub async fn ask(
    ctx: &ServiceContext,
    settings: &AssistantSettings,
    project_record_id: &str,
    task_id: Option<&str>,
    question: &str,
) -> Result<String, String> {
    if question.trim().is_empty() {
        return Err("Question must not be empty".to_string());
    }

    let guidance = build_guidance_context(ctx.records.as_ref(), project_record_id, task_id).await;
    debug!(project = project_record_id, guided = guidance.is_some(), "assembled assistant prompt");

    let request = CompletionRequest {
        model: settings.model.clone(),
        system: Some(prompt::SYSTEM_PROMPT.to_string()),
        prompt: prompt::user_prompt(question, guidance.as_ref()),
        max_tokens: settings.max_tokens,
    };
    let response = ctx
        .llm
        .complete(&request)
        .await
        .map_err(|e| format!("Assistant request failed: {e}"))?;
    info!(
        prompt_tokens = response.prompt_tokens,
        completion_tokens = response.completion_tokens,
        "assistant answered"
    );
    Ok(response.text.trim().to_string())
}
