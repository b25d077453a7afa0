use std::{fs, time::Duration};

use orchestrator::{OrchestratorError, Pipeline, Report, StageSpec, StageStatus};
use tokio::time::timeout;

const LIMIT: Duration = Duration::from_secs(20);

fn sh(name: &str, script: &str) -> StageSpec {
    StageSpec::new(name, "sh").args(["-c", script])
}

fn cat(name: &str) -> StageSpec {
    StageSpec::new(name, "cat")
}

async fn run(pipeline: Pipeline, deadline: Option<Duration>) -> Report {
    let session = orchestrator::train(pipeline).unwrap();
    timeout(LIMIT, session.wait(deadline))
        .await
        .expect("pipeline hung")
}

#[tokio::test]
async fn data_flows_through_every_stage() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.txt");

    let pipeline = Pipeline::new()
        .stage(sh("source", "printf 'a\\nb\\n'"))
        .stage(cat("first"))
        .stage(cat("second"))
        .stage(StageSpec::new("upper", "tr").args(["a-z", "A-Z"]))
        .stdout(fs::File::create(&out).unwrap());

    let report = run(pipeline, None).await;

    assert!(report.success(), "{report:?}");
    assert_eq!(report.outcomes().len(), 4);
    assert!(report.outcomes().iter().all(|o| o.pid.is_some()));
    assert_eq!(fs::read_to_string(&out).unwrap(), "A\nB\n");
}

#[tokio::test]
async fn first_stage_reads_the_pipeline_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.txt");
    let out = dir.path().join("out.txt");
    fs::write(&input, "x\ny\nz\n").unwrap();

    let pipeline = Pipeline::new()
        .stage(cat("source"))
        .stage(StageSpec::new("count", "wc").arg("-l"))
        .stdin(fs::File::open(&input).unwrap())
        .stdout(fs::File::create(&out).unwrap());

    let report = run(pipeline, None).await;

    assert!(report.success(), "{report:?}");
    assert_eq!(fs::read_to_string(&out).unwrap().trim(), "3");
}

#[tokio::test]
async fn large_streams_complete_under_backpressure() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.txt");

    // Far more than a pipe buffer holds, at every hop.
    let pipeline = Pipeline::new()
        .stage(sh("source", "seq 1 200000"))
        .stage(cat("first"))
        .stage(cat("second"))
        .stage(sh("check", "awk 'NR != $1 { bad = 1 } END { print NR, bad + 0 }'"))
        .stdout(fs::File::create(&out).unwrap());

    let report = run(pipeline, None).await;

    assert!(report.success(), "{report:?}");
    assert_eq!(fs::read_to_string(&out).unwrap().trim(), "200000 0");
}

#[tokio::test]
async fn spawn_failure_still_reaps_started_stages() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.txt");

    let pipeline = Pipeline::new()
        .stage(sh("source", "seq 1 200000"))
        .stage(cat("relay"))
        .stage(StageSpec::new("missing", dir.path().join("no-such-program")))
        .stage(cat("sink"))
        .stdout(fs::File::create(&out).unwrap());

    let report = run(pipeline, None).await;
    let outcomes = report.outcomes();

    assert!(!report.success());
    assert!(matches!(outcomes[2].status, StageStatus::SpawnFailed(_)));
    assert!(matches!(outcomes[3].status, StageStatus::NotStarted));
    for started in &outcomes[..2] {
        assert!(started.pid.is_some());
        assert!(
            matches!(
                started.status,
                StageStatus::Exited(_) | StageStatus::Signaled(_)
            ),
            "{started}"
        );
    }
    assert_eq!(fs::read_to_string(&out).unwrap(), "");
}

#[tokio::test]
async fn exit_codes_and_signals_are_reported_distinctly() {
    let pipeline = Pipeline::new()
        .stage(sh("ok", "exit 0"))
        .stage(sh("fails", "cat > /dev/null; exit 3"))
        .stage(sh("killed", "cat > /dev/null; kill -9 $$"))
        .stdout(std::process::Stdio::null());

    let report = run(pipeline, None).await;
    let outcomes = report.outcomes();

    assert!(!report.success());
    assert!(matches!(outcomes[0].status, StageStatus::Exited(0)));
    assert!(matches!(outcomes[1].status, StageStatus::Exited(3)));
    assert!(matches!(outcomes[2].status, StageStatus::Signaled(9)));
    assert_eq!(report.failures().count(), 2);
}

#[tokio::test]
async fn hung_stages_are_killed_at_the_deadline() {
    let pipeline = Pipeline::new()
        .stage(sh("quick", "echo done"))
        .stage(sh("stuck", "cat > /dev/null; sleep 30"))
        .stdout(std::process::Stdio::null());

    let started = std::time::Instant::now();
    let report = run(pipeline, Some(Duration::from_millis(500))).await;

    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(matches!(report.outcomes()[0].status, StageStatus::Exited(0)));
    assert!(matches!(report.outcomes()[1].status, StageStatus::TimedOut));
    assert!(!report.success());
}

#[tokio::test]
async fn unreachable_deadline_waits_for_completion() {
    let pipeline = Pipeline::new()
        .stage(sh("source", "echo done"))
        .stage(cat("sink"))
        .stdout(std::process::Stdio::null());

    let report = run(pipeline, Some(Duration::MAX)).await;

    assert!(report.success(), "{report:?}");
}

#[tokio::test]
async fn empty_pipeline_is_rejected() {
    let err = orchestrator::train(Pipeline::new()).err().unwrap();
    assert!(matches!(err, OrchestratorError::EmptyPipeline));
}
