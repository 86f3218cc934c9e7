// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Gathers every Test's identity and result directory across a run and
//! writes a navigational index once the enclosing test-group's "after"
//! report stack shuts down. Test identity isn't carried on the wire, so
//! the engine records each completed Test into a shared registry directly;
//! `Index` itself is a pass-through stage that renders that registry once
//! its input closes.

use crate::error::ReportError;
use crate::reporter::{drain_and_forward, EventStream, EventTx, Reporter};
use antler_core::TestId;
use antler_store::Workspace;
use async_trait::async_trait;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Serialize)]
pub struct IndexEntry {
    pub test_id: TestId,
    pub result_dir: PathBuf,
}

pub type IndexRegistry = Arc<Mutex<Vec<IndexEntry>>>;

/// Called by the engine once a Test's result directory has been promoted.
pub fn record(registry: &IndexRegistry, test_id: TestId, result_dir: PathBuf) {
    registry.lock().expect("index registry poisoned").push(IndexEntry { test_id, result_dir });
}

pub struct Index<'w> {
    workspace: &'w Workspace,
    registry: IndexRegistry,
}

impl<'w> Index<'w> {
    pub fn new(workspace: &'w Workspace, registry: IndexRegistry) -> Self {
        Index { workspace, registry }
    }
}

#[async_trait]
impl<'w> Reporter for Index<'w> {
    async fn run(&mut self, rx: EventStream, tx: Option<EventTx>) -> Result<(), ReportError> {
        drain_and_forward(rx, tx).await;

        let entries = self.registry.lock().expect("index registry poisoned").clone();
        let rendered = serde_json::to_vec_pretty(&entries)?;
        let mut writer = self.workspace.create_writer("index.json").await?;
        writer.write(&rendered).await?;
        writer.close().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn writes_every_recorded_test_into_the_index() {
        let dir = tempdir().unwrap();
        let workspace = Workspace::create(dir.path(), None).await.unwrap();
        let registry: IndexRegistry = Arc::new(Mutex::new(Vec::new()));
        record(&registry, TestId::new([("proto".into(), "bbr".into())]), dir.path().join("20260101T000000.000Z"));

        let mut stage = Index::new(&workspace, registry);
        let (tx, rx) = mpsc::channel(1);
        drop(tx);
        stage.run(rx, None).await.unwrap();

        let contents = tokio::fs::read_to_string(dir.path().join("index.json")).await.unwrap();
        assert!(contents.contains("bbr"));
    }
}
