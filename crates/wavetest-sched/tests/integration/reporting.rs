//! Reporting integration tests
//!
//! Full pipeline: register, schedule, summarize, emit. The reporter only
//! ever sees snapshots, so these also pin down that summarizing a finished
//! run never disturbs case state.

use std::time::Duration;

use wavetest_report::{summarize, ReportError};
use wavetest_sched::{RegisterOptions, Scheduler, TestBody, TestContext, TestRun, TestStatus};

use crate::support::init_tracing;

fn mixed_run() -> TestRun {
    let mut run = TestRun::new();
    run.register("passes", |ctx| ctx.assert_true(true, "holds"))
        .unwrap();
    run.register("fails", |ctx| ctx.assert_eq(&2, &1, "count"))
        .unwrap();
    run.register("panics", |_| panic!("unexpected state"))
        .unwrap();
    run.register_with(
        "hangs",
        RegisterOptions::default().with_timeout(Duration::from_millis(20)),
        TestBody::suspendable(|ctx: TestContext| async move {
            ctx.sleep(Duration::from_secs(60)).await;
        }),
    )
    .unwrap();
    run.register_with(
        "tolerated",
        RegisterOptions::advisory(),
        TestBody::sync(|ctx: &TestContext| ctx.fail("known host bug")),
    )
    .unwrap();
    run
}

#[test]
fn test_full_pipeline_counts() {
    init_tracing();
    let mut run = mixed_run();
    Scheduler::new().run_blocking(&mut run).unwrap();

    let summary = summarize(&run).unwrap();
    assert_eq!(summary.total, 5);
    assert_eq!(summary.passed, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.errored, 1);
    assert_eq!(summary.timed_out, 1);
    assert_eq!(summary.advisory, 1);
    assert!(!summary.all_passed());
}

#[test]
fn test_summarize_does_not_disturb_cases() {
    init_tracing();
    let mut run = mixed_run();
    Scheduler::new().run_blocking(&mut run).unwrap();

    let before = run.snapshots();
    let _ = summarize(&run).unwrap();
    let _ = summarize(&run).unwrap();
    let after = run.snapshots();

    for (b, a) in before.iter().zip(after.iter()) {
        assert_eq!(b.status, a.status);
        assert_eq!(b.failures, a.failures);
    }
}

#[test]
fn test_summarize_before_scheduling_is_rejected() {
    init_tracing();
    let run = mixed_run();
    assert!(matches!(
        summarize(&run),
        Err(ReportError::NotTerminal { .. })
    ));
}

#[test]
fn test_collector_channel_is_structured() {
    init_tracing();
    let mut run = mixed_run();
    Scheduler::new().run_blocking(&mut run).unwrap();
    let summary = summarize(&run).unwrap();

    let mut collector = Vec::new();
    summary.write_to(&mut collector).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&collector).unwrap();

    assert_eq!(value["total"], 5);
    assert_eq!(value["cases"][0]["name"], "passes");
    assert_eq!(value["cases"][3]["status"], "timeout");
    assert_eq!(value["cases"][4]["status"], "advisory");
}

#[test]
fn test_human_readable_diagnostics() {
    init_tracing();
    let mut run = mixed_run();
    Scheduler::new().run_blocking(&mut run).unwrap();
    let listing = summarize(&run).unwrap().to_string();

    assert!(listing.contains("PASS passes"));
    assert!(listing.contains("FAIL fails"));
    assert!(listing.contains("    assert_eq: count: expected 1, got 2"));
    assert!(listing.contains("ERROR panics"));
    assert!(listing.contains("    uncaught panic: unexpected state"));
    assert!(listing.contains("TIMEOUT hangs"));
}

#[tokio::test]
async fn test_scheduler_embeds_in_a_local_set() {
    init_tracing();
    let mut run = TestRun::new();
    run.register_async("embedded", |ctx| async move {
        ctx.next_frame().await;
        ctx.assert_true(true, "resumed under the embedding loop");
    })
    .unwrap();

    let local = tokio::task::LocalSet::new();
    local
        .run_until(async { Scheduler::new().run(&mut run).await })
        .await;

    assert_eq!(run.snapshots()[0].status, TestStatus::Pass);
    assert!(summarize(&run).unwrap().all_passed());
}
