//! Record-replay round-trip integration test.
//!
//! Proves that the record/replay system works end-to-end:
//! 1. Record a session using `CassetteRecorder`.
//! 2. Replay the cassette using `ServiceContext::replaying()`.
//! 3. Build the guidance context and assert the derived sequence.
//! 4. Replay a second time and assert determinism.

use std::path::Path;

use serde_json::json;

use portal::cassette::recorder::CassetteRecorder;
use portal::context::ServiceContext;
use portal::guidance::{build_guidance_context, GuidanceContext};

fn write_cassette(path: &Path) {
    let mut recorder = CassetteRecorder::new(path, "roundtrip-test");
    recorder.record(
        "records",
        "get_project",
        json!({"record_id": "recP1"}),
        json!({"Ok": {"id": "recP1", "fields": {"Project ID": "ACME-001", "Project Name": "Acme Audit"}}}),
    );
    // Two groups share an order; the lower task order wins across them.
    recorder.record(
        "records",
        "list_task_groups",
        json!({"project_id": "ACME-001"}),
        json!({"Ok": [
            {"id": "recGA", "fields": {"Group Name": "Tax", "Group Order": 1}},
            {"id": "recGB", "fields": {"Group Name": "Payroll", "Group Order": 1}},
            {"id": "recGC", "fields": {"Group Name": "Close", "Group Order": 2}}
        ]}),
    );
    recorder.record(
        "records",
        "list_tasks",
        json!({"project_id": "ACME-001"}),
        json!({"Ok": [
            {"id": "recT1", "fields": {"Task": "Upload W-2s", "Task Order": 5, "Group": ["recGA"], "Status": "Completed"}},
            {"id": "recT2", "fields": {"Task": "Confirm headcount", "Task Order": 3, "Group": ["recGB"]}},
            {"id": "recT3", "fields": {"Task": "Approve close", "Task Order": 1, "Group": ["recGC"]}},
            {"id": "recT4", "fields": {"Task": "Stray item", "Task Order": 1, "Group": ["recGZ"]}}
        ]}),
    );
    recorder.finish().expect("recording should succeed");
}

async fn replay(path: &Path) -> GuidanceContext {
    let ctx = ServiceContext::replaying(path).unwrap();
    build_guidance_context(ctx.records.as_ref(), "recP1", Some("recT2"))
        .await
        .expect("guidance should be available")
}

#[tokio::test]
async fn record_then_replay_produces_identical_guidance() {
    let dir = std::env::temp_dir().join("portal_record_replay_test");
    std::fs::create_dir_all(&dir).unwrap();
    let cassette_path = dir.join("roundtrip.cassette.yaml");
    write_cassette(&cassette_path);

    let first = replay(&cassette_path).await;
    let order: Vec<&str> = first.sequence.iter().map(|e| e.task_id.as_str()).collect();
    assert_eq!(order, ["recT2", "recT1", "recT3", "recT4"]);
    assert_eq!(first.current_task_index, Some(0));
    assert!(first.previous_tasks.is_empty());
    let next: Vec<&str> = first.next_tasks.iter().map(|e| e.task_id.as_str()).collect();
    assert_eq!(next, ["recT3", "recT4"]);
    assert_eq!(first.ungrouped_tasks.len(), 1, "unknown group reference counts as ungrouped");

    let second = replay(&cassette_path).await;
    assert_eq!(first, second, "determinism: guidance differs between replays");

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn replay_without_matching_interactions_yields_no_guidance() {
    let dir = std::env::temp_dir().join("portal_record_replay_partial");
    std::fs::create_dir_all(&dir).unwrap();
    let cassette_path = dir.join("partial.cassette.yaml");

    let mut recorder = CassetteRecorder::new(&cassette_path, "partial");
    recorder.record(
        "records",
        "get_project",
        json!({"record_id": "recP1"}),
        json!({"Ok": {"id": "recP1", "fields": {"Project ID": "ACME-001"}}}),
    );
    recorder.finish().unwrap();

    let ctx = ServiceContext::replaying(&cassette_path).unwrap();
    assert!(build_guidance_context(ctx.records.as_ref(), "recP1", None).await.is_none());

    let _ = std::fs::remove_dir_all(&dir);
}
