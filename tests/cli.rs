//! Integration tests for top-level CLI behavior.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::json;

use portal::cassette::recorder::CassetteRecorder;

fn portal() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_portal"));
    // Keep the host environment from leaking into the run.
    for var in ["AIRTABLE_API_KEY", "AIRTABLE_BASE_ID", "PORTAL_RECORD", "PORTAL_REPLAY", "PORTAL_LOG", "ANTHROPIC_API_KEY"] {
        cmd.env_remove(var);
    }
    cmd.current_dir(std::env::temp_dir());
    cmd
}

fn run_portal(args: &[&str]) -> std::process::Output {
    portal().args(args).output().expect("failed to run portal binary")
}

fn run_replaying(cassette: &Path, args: &[&str]) -> std::process::Output {
    portal().env("PORTAL_REPLAY", cassette).args(args).output().expect("failed to run portal binary")
}

fn project_cassette(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("portal_cli_{name}"));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("project.cassette.yaml");
    let mut recorder = CassetteRecorder::new(&path, name);
    recorder.record(
        "records",
        "get_project",
        json!({"record_id": "recP1"}),
        json!({"Ok": {"id": "recP1", "fields": {"Project ID": "ACME-001", "Project Name": "Acme Audit", "Status": "Active"}}}),
    );
    recorder.record(
        "records",
        "list_task_groups",
        json!({"project_id": "ACME-001"}),
        json!({"Ok": [{"id": "recG1", "fields": {"Group Name": "Onboarding", "Group Order": 1}}]}),
    );
    recorder.record(
        "records",
        "list_tasks",
        json!({"project_id": "ACME-001"}),
        json!({"Ok": [
            {"id": "recT1", "fields": {"Task": "Sign engagement letter", "Task Order": 1, "Group": ["recG1"], "Status": "Completed"}},
            {"id": "recT2", "fields": {"Task": "Upload trial balance", "Task Order": 2, "Group": ["recG1"]}}
        ]}),
    );
    recorder.record(
        "llm",
        "complete",
        json!(null),
        json!({"Ok": {"text": "Upload your trial balance.", "prompt_tokens": 40, "completion_tokens": 6}}),
    );
    recorder.finish().unwrap();
    path
}

#[test]
fn help_lists_subcommands() {
    let output = run_portal(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    for sub in ["projects", "show", "guide", "ask", "update"] {
        assert!(stdout.contains(sub), "help is missing {sub}");
    }
}

#[test]
fn version_flag_succeeds() {
    let output = run_portal(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.starts_with("portal "));
}

#[test]
fn log_filter_is_read_from_dotenv() {
    let cassette = project_cassette("dotenv_log");
    let workdir = cassette.parent().unwrap().join("workdir");
    std::fs::create_dir_all(&workdir).unwrap();

    let quiet = run_replaying(&cassette, &["guide", "recP1"]);
    assert!(!String::from_utf8_lossy(&quiet.stderr).contains("fetched project records"));

    std::fs::write(workdir.join(".env"), "PORTAL_LOG=debug\n").unwrap();
    let output = portal()
        .current_dir(&workdir)
        .env("PORTAL_REPLAY", &cassette)
        .args(["guide", "recP1"])
        .output()
        .expect("failed to run portal binary");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "{stderr}");
    assert!(stderr.contains("fetched project records"), "{stderr}");
}

#[test]
fn invalid_subcommand_exits_with_error() {
    let output = run_portal(&["nonsense"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("unrecognized subcommand"));
}

#[test]
fn missing_credentials_are_reported() {
    let output = run_portal(&["projects"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("AIRTABLE_API_KEY is not set"));
}

#[test]
fn guide_replays_cassette() {
    let cassette = project_cassette("guide");
    let output = run_replaying(&cassette, &["guide", "recP1", "--task", "recT2"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["projectName"], "Acme Audit");
    assert_eq!(json["completedTasks"], 1);
    assert_eq!(json["currentTaskIndex"], 1);
    assert_eq!(json["previousTasks"][0]["taskId"], "recT1");
}

#[test]
fn show_replays_cassette() {
    let cassette = project_cassette("show");
    let output = run_replaying(&cassette, &["show", "recP1"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("=== Acme Audit ==="));
    assert!(stdout.contains("Progress: 1/2"));
    assert!(stdout.contains("[ ] Upload trial balance"));
}

#[test]
fn ask_replays_assistant_answer() {
    let cassette = project_cassette("ask");
    let output = run_replaying(&cassette, &["ask", "recP1", "--task", "recT2", "What", "now?"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(stdout.trim(), "Upload your trial balance.");
}

#[test]
fn update_prints_weekly_digest() {
    let cassette = project_cassette("update");
    let output = run_replaying(&cassette, &["update", "recP1", "--date", "2025-03-07"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("Week of March 7, 2025"));
    assert!(stdout.contains("Coming up:\n  - Upload trial balance (Onboarding)"));
}
