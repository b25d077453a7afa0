use std::{process::Stdio, time::Duration};

use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines},
    process::{Child, ChildStderr, ChildStdout, Command},
    time::timeout,
};

const LIMIT: Duration = Duration::from_secs(10);

fn spawn(program: &str) -> Child {
    Command::new(program)
        .env("RUST_LOG", "info")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .unwrap()
}

fn send_signal(child: &Child, signal: &str) {
    let pid = child.id().unwrap().to_string();
    let status = std::process::Command::new("kill")
        .args([signal, &pid])
        .status()
        .unwrap();
    assert!(status.success());
}

fn lines<R: tokio::io::AsyncRead + Unpin>(reader: R) -> Lines<BufReader<R>> {
    BufReader::new(reader).lines()
}

async fn next_line<R: tokio::io::AsyncRead + Unpin>(lines: &mut Lines<BufReader<R>>) -> String {
    timeout(LIMIT, lines.next_line())
        .await
        .expect("no line in time")
        .unwrap()
        .expect("stream ended")
}

/// Reads diagnostics until a line containing `needle` shows up.
async fn wait_for(stderr: &mut Lines<BufReader<ChildStderr>>, needle: &str) -> String {
    loop {
        let line = next_line(stderr).await;
        if line.contains(needle) {
            return line;
        }
    }
}

async fn rest(mut lines: Lines<BufReader<ChildStdout>>) -> Vec<String> {
    let mut out = Vec::new();
    while let Some(line) = timeout(LIMIT, lines.next_line()).await.unwrap().unwrap() {
        out.push(line);
    }
    out
}

#[tokio::test]
async fn monitor_snapshot_then_stop() {
    let mut monitor = spawn(env!("CARGO_BIN_EXE_monitor"));
    let mut stdin = monitor.stdin.take().unwrap();
    let mut stdout = lines(monitor.stdout.take().unwrap());
    let mut stderr = lines(monitor.stderr.take().unwrap());

    stdin.write_all(b"1 2 0\n").await.unwrap();
    assert_eq!(next_line(&mut stdout).await, "SAMPLE 1 LOSS 2 YHAT 0");

    send_signal(&monitor, "-USR1");
    let snapshot = wait_for(&mut stderr, "snapshot count=").await;
    assert!(
        snapshot.ends_with("snapshot count=1 avg_loss=2 avg_prediction=0"),
        "{snapshot}"
    );

    // stdin stays open: only the stop request can end the stage.
    send_signal(&monitor, "-TERM");
    assert_eq!(rest(stdout).await, ["SUMMARY 1 2 0"]);

    let status = timeout(LIMIT, monitor.wait()).await.unwrap().unwrap();
    assert!(status.success());
    drop(stdin);
}

#[tokio::test]
async fn monitor_ignores_snapshot_before_first_record() {
    let mut monitor = spawn(env!("CARGO_BIN_EXE_monitor"));
    let mut stdin = monitor.stdin.take().unwrap();
    let stdout = lines(monitor.stdout.take().unwrap());
    let mut stderr = lines(monitor.stderr.take().unwrap());

    wait_for(&mut stderr, "SIGUSR1").await;
    send_signal(&monitor, "-USR1");
    tokio::time::sleep(Duration::from_millis(100)).await;

    stdin.write_all(b"3 0.5 1\n").await.unwrap();
    drop(stdin);

    assert_eq!(rest(stdout).await, ["SAMPLE 3 LOSS 0.5 YHAT 1", "SUMMARY 1 0.5 1"]);
    assert!(timeout(LIMIT, monitor.wait()).await.unwrap().unwrap().success());

    let mut diagnostics = Vec::new();
    while let Some(line) = stderr.next_line().await.unwrap() {
        diagnostics.push(line);
    }
    assert!(
        diagnostics.iter().all(|line| !line.contains("snapshot count=")),
        "{diagnostics:?}"
    );
}

#[tokio::test]
async fn monitor_without_samples_prints_no_summary() {
    let mut monitor = spawn(env!("CARGO_BIN_EXE_monitor"));
    let mut stdin = monitor.stdin.take().unwrap();
    let stdout = lines(monitor.stdout.take().unwrap());
    let mut stderr = lines(monitor.stderr.take().unwrap());

    stdin.write_all(b"garbage\n").await.unwrap();
    drop(stdin);

    assert!(rest(stdout).await.is_empty());
    wait_for(&mut stderr, "no samples processed").await;
    assert!(timeout(LIMIT, monitor.wait()).await.unwrap().unwrap().success());
}

#[tokio::test]
async fn learner_stop_still_saves_parameters() {
    let dir = tempfile::tempdir().unwrap();
    let model_file = dir.path().join("logs").join("params.txt");

    let mut learner = Command::new(env!("CARGO_BIN_EXE_learner"))
        .env("MODEL_FILE", &model_file)
        .env("LEARNER_MODE", "train")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .unwrap();
    let mut stdin = learner.stdin.take().unwrap();
    let mut stdout = lines(learner.stdout.take().unwrap());

    stdin.write_all(b"1 0 0 0 0 2\n").await.unwrap();
    assert_eq!(next_line(&mut stdout).await, "1 2 0");

    send_signal(&learner, "-TERM");
    assert!(timeout(LIMIT, learner.wait()).await.unwrap().unwrap().success());

    let saved = std::fs::read_to_string(&model_file).unwrap();
    assert_eq!(saved.lines().next(), Some("8 4"));
    assert_eq!(saved.lines().last(), Some("0.002"));
    drop(stdin);
}
