//! Command dispatch and handlers.

pub mod ask;
pub mod guide;
pub mod projects;
pub mod show;
pub mod update;

use std::env;
use std::future::Future;
use std::path::PathBuf;

use tracing::info;

use crate::cassette::session::RecordingSession;
use crate::cli::Command;
use crate::config::{AssistantSettings, PortalConfig};
use crate::context::ServiceContext;

/// Directory to record port interactions into.
pub const RECORD_ENV: &str = "PORTAL_RECORD";
/// Cassette file or recording directory to replay instead of live services.
pub const REPLAY_ENV: &str = "PORTAL_REPLAY";

/// Dispatch a parsed command to its handler.
///
/// When `PORTAL_REPLAY` is set, ports are served from cassettes and no
/// record backend credentials are needed. When `PORTAL_RECORD` is set to a
/// directory path, all port interactions are recorded to per-port cassette
/// files in that directory.
///
/// # Errors
///
/// Returns an error string if configuration is incomplete or the selected
/// command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    if let Ok(path) = env::var(REPLAY_ENV) {
        let ctx = ServiceContext::replaying(&PathBuf::from(path))?;
        let settings = AssistantSettings::from_env().map_err(|e| e.to_string())?;
        return block_on(dispatch_with_context(command, &ctx, &settings));
    }

    let config = PortalConfig::from_env().map_err(|e| format!("Configuration error: {e}"))?;
    if let Ok(path) = env::var(RECORD_ENV) {
        let (ctx, session) = ServiceContext::recording_at(&config, &PathBuf::from(path));
        let result = block_on(dispatch_with_context(command, &ctx, &config.assistant));
        // Release the recorder handles held by the adapters.
        drop(ctx);
        finish_recording(session)?;
        return result;
    }

    let ctx = ServiceContext::live(&config);
    block_on(dispatch_with_context(command, &ctx, &config.assistant))
}

/// Dispatch a command with the given service context.
async fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
    settings: &AssistantSettings,
) -> Result<(), String> {
    match command {
        Command::Projects => projects::run(ctx).await,
        Command::Show { project } => show::run(ctx, project).await,
        Command::Guide { project, task } => guide::run(ctx, project, task.as_deref()).await,
        Command::Ask { project, task, question } => {
            ask::run(ctx, settings, project, task.as_deref(), &question.join(" ")).await
        }
        Command::Update { project, date } => update::run(ctx, project, *date).await,
    }
}

fn block_on<F: Future<Output = Result<(), String>>>(future: F) -> Result<(), String> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?
        .block_on(future)
}

/// Finish a recording session and print the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    info!(dir = %output_dir.display(), "recording saved");
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}

/// Shared fixtures for command tests.
#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::json;

    use crate::cassette::recorder::CassetteRecorder;
    use crate::context::ServiceContext;

    /// A replaying context for project `recP1` with two groups and four
    /// tasks, one of them ungrouped.
    pub fn project_context() -> ServiceContext {
        let mut rec = CassetteRecorder::new("fixture.cassette.yaml", "fixture");
        rec.record(
            "records",
            "get_project",
            json!({"record_id": "recP1"}),
            json!({"Ok": {"id": "recP1", "fields": {
                "Project ID": "ACME-001",
                "Project Name": "Acme Audit",
                "Project Type": "Audit",
                "Status": "Active"
            }}}),
        );
        rec.record(
            "records",
            "list_task_groups",
            json!({"project_id": "ACME-001"}),
            json!({"Ok": [
                {"id": "recG2", "fields": {"Group Name": "Fieldwork", "Group Order": 2}},
                {"id": "recG1", "fields": {"Group Name": "Onboarding", "Group Order": 1}}
            ]}),
        );
        rec.record(
            "records",
            "list_tasks",
            json!({"project_id": "ACME-001"}),
            json!({"Ok": [
                {"id": "recT3", "fields": {"Task": "Provide bank statements", "Task Order": 1, "Group": ["recG2"], "Status": "In Progress", "Action Type": "Upload"}},
                {"id": "recT1", "fields": {"Task": "Sign engagement letter", "Task Order": 1, "Group": ["recG1"], "Status": "Completed", "Action Type": "Sign"}},
                {"id": "recT2", "fields": {"Task": "Complete questionnaire", "Task Order": 2, "Group": ["recG1"], "Status": "Completed"}},
                {"id": "recT4", "fields": {"Task": "Review draft report", "Task Order": 1}}
            ]}),
        );
        ServiceContext::replaying_cassette(&rec.into_cassette())
    }
}
