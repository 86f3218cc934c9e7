// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use antler_core::Duration;
use antler_tree::RunnerSpec;

fn sleep_run(ms: u64) -> Run {
    Run::Leaf(RunnerSpec::Sleep { duration: Duration::from_nanos(ms * 1_000_000) })
}

#[tokio::test]
async fn execute_runs_serial_leaves_to_completion() {
    let (tx, _rx) = mpsc::channel(8);
    let node = Node::new(NodeId::from("n1"), tx, Arc::new(BinaryRegistry::new()));

    let run = Run::Serial(vec![sleep_run(1), sleep_run(1)]);
    node.execute(&run).await.unwrap();
}

#[tokio::test]
async fn execute_runs_parallel_branches_concurrently() {
    let (tx, _rx) = mpsc::channel(8);
    let node = Node::new(NodeId::from("n1"), tx, Arc::new(BinaryRegistry::new()));

    let run = Run::Parallel(vec![sleep_run(50), sleep_run(50)]);
    let started = tokio::time::Instant::now();
    node.execute(&run).await.unwrap();
    assert!(started.elapsed() < std::time::Duration::from_millis(150), "branches should overlap, not add up");
}

#[tokio::test]
async fn execute_reports_missing_launcher_for_unregistered_child() {
    let (tx, _rx) = mpsc::channel(8);
    let node = Node::new(NodeId::from("n1"), tx, Arc::new(BinaryRegistry::new()));

    let run = Run::Child { node: NodeId::from("unregistered"), run: Box::new(sleep_run(1)) };
    let err = node.execute(&run).await.unwrap_err();
    assert!(matches!(err, NodeError::NoLauncher(_)));
}

#[tokio::test]
async fn cancel_unblocks_a_long_sleep_leaf() {
    let (tx, _rx) = mpsc::channel(8);
    let node = Arc::new(Node::new(NodeId::from("n1"), tx, Arc::new(BinaryRegistry::new())));

    let run = sleep_run(60_000);
    let node_for_task = node.clone();
    let handle = tokio::spawn(async move { node_for_task.execute(&run).await });

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    node.cancel(CancelCause::OperatorRequested);

    let result = tokio::time::timeout(std::time::Duration::from_secs(1), handle).await;
    assert!(result.is_ok(), "execute should return promptly after cancel");
}
