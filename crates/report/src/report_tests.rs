use crate::analyze::AnalyzeSlot;
use crate::*;
use antler_core::{Duration, NodeId};
use antler_store::Workspace;
use antler_wire::{FileDataEvent, Message, StreamIoEvent};
use std::sync::Mutex;
use tempfile::tempdir;
use tokio::sync::mpsc;

#[tokio::test]
async fn save_files_then_analyze_chain_forwards_unrelated_events() {
    let dir = tempdir().unwrap();
    let workspace = Workspace::create(dir.path(), None).await.unwrap();
    let mut save_files = SaveFiles::new(&workspace, true);
    let mut analyze = Analyze::new(AnalyzeSlot::default());

    let (head_tx, head_rx) = mpsc::channel(8);
    let (mid_tx, mid_rx) = mpsc::channel(8);

    let node = NodeId::from("client");
    head_tx
        .send(Message::FileData(FileDataEvent { node: node.clone(), name: "log.txt".into(), data: b"hi".to_vec() }))
        .await
        .unwrap();
    head_tx
        .send(Message::StreamIo(StreamIoEvent {
            flow: antler_core::FlowId::from("upload"),
            t: Duration::from_nanos(1_000_000_000),
            sent: true,
            total_bytes: 125_000,
        }))
        .await
        .unwrap();
    drop(head_tx);

    save_files.run(head_rx, Some(mid_tx)).await.unwrap();
    analyze.run(mid_rx, None).await.unwrap();

    assert!(dir.path().join("log.txt").exists());
}

#[test]
fn index_registry_accumulates_across_tests() {
    let registry: IndexRegistry = std::sync::Arc::new(Mutex::new(Vec::new()));
    record_index_entry(&registry, antler_core::TestId::new([("a".into(), "1".into())]), "result-a".into());
    record_index_entry(&registry, antler_core::TestId::new([("a".into(), "2".into())]), "result-b".into());
    assert_eq!(registry.lock().unwrap().len(), 2);
}
