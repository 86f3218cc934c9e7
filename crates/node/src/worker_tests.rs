use super::*;
use antler_core::Duration;
use antler_tree::{Run, RunnerSpec};

#[tokio::test]
async fn worker_runs_a_sleep_leaf_and_reports_bye() {
    let (engine_side, worker_side) = tokio::io::duplex(8192);
    let registry = Arc::new(BinaryRegistry::new());

    let worker = tokio::spawn(run_worker(Transport::new(worker_side), registry, NodeId::from("leaf")));

    let mut engine = Transport::new(engine_side);
    let run = Run::Leaf(RunnerSpec::Sleep { duration: Duration::ZERO });
    let run_json = serde_json::to_string(&run).unwrap();
    engine.send(RoutingFlag::PROCESS, &Message::StartRun { run_json }).await.unwrap();

    loop {
        let (_, message) = engine.recv().await.unwrap();
        if matches!(message, Message::Bye { error: None }) {
            break;
        }
    }

    worker.await.unwrap();
}

#[tokio::test]
async fn worker_reports_bye_with_error_on_undecodable_run() {
    let (engine_side, worker_side) = tokio::io::duplex(8192);
    let registry = Arc::new(BinaryRegistry::new());

    let worker = tokio::spawn(run_worker(Transport::new(worker_side), registry, NodeId::from("leaf")));

    let mut engine = Transport::new(engine_side);
    engine.send(RoutingFlag::PROCESS, &Message::StartRun { run_json: "not json".into() }).await.unwrap();

    let (_, message) = engine.recv().await.unwrap();
    assert!(matches!(message, Message::Bye { error: Some(_) }));

    worker.await.unwrap();
}
