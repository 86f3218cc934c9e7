// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Routes `FileData` chunks to named result files inside a workspace,
//! emitting one `FileRef` the first time a name is seen.

use crate::error::ReportError;
use crate::reporter::{EventStream, EventTx, Reporter};
use antler_store::Workspace;
use antler_wire::{FileRefEvent, Message};
use async_trait::async_trait;
use std::collections::HashMap;

pub struct SaveFiles<'w> {
    workspace: &'w Workspace,
    writers: HashMap<String, antler_store::Writer>,
    /// When `true`, `FileData` is consumed rather than forwarded, keeping
    /// the rest of the pipeline from having to carry raw file bytes.
    consume: bool,
}

impl<'w> SaveFiles<'w> {
    pub fn new(workspace: &'w Workspace, consume: bool) -> Self {
        SaveFiles { workspace, writers: HashMap::new(), consume }
    }

    async fn close_all(&mut self) -> Result<(), ReportError> {
        for (_, writer) in self.writers.drain() {
            writer.close().await?;
        }
        Ok(())
    }
}

#[async_trait]
impl<'w> Reporter for SaveFiles<'w> {
    async fn run(&mut self, mut rx: EventStream, tx: Option<EventTx>) -> Result<(), ReportError> {
        while let Some(event) = rx.recv().await {
            let Message::FileData(ref data) = event else {
                if let Some(tx) = &tx {
                    if tx.send(event).await.is_err() {
                        break;
                    }
                }
                continue;
            };

            let is_new = !self.writers.contains_key(&data.name);
            if is_new {
                let writer = self.workspace.create_writer(&data.name).await?;
                self.writers.insert(data.name.clone(), writer);
            }
            let writer = self.writers.get_mut(&data.name).expect("writer just inserted");
            writer.write(&data.data).await?;

            if is_new {
                let reference = Message::FileRef(FileRefEvent { node: data.node.clone(), name: data.name.clone() });
                if let Some(tx) = &tx {
                    if tx.send(reference).await.is_err() {
                        break;
                    }
                }
            }

            if !self.consume {
                if let Some(tx) = &tx {
                    if tx.send(event).await.is_err() {
                        break;
                    }
                }
            }
        }
        self.close_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use antler_core::NodeId;
    use antler_wire::FileDataEvent;
    use tempfile::tempdir;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn emits_one_file_ref_per_new_name() {
        let dir = tempdir().unwrap();
        let workspace = Workspace::create(dir.path(), None).await.unwrap();
        let mut stage = SaveFiles::new(&workspace, true);

        let (tx, rx) = mpsc::channel(8);
        let (out_tx, mut out_rx) = mpsc::channel(8);
        let node = NodeId::from("client");
        tx.send(Message::FileData(FileDataEvent { node: node.clone(), name: "cap.pcap".into(), data: b"a".to_vec() }))
            .await
            .unwrap();
        tx.send(Message::FileData(FileDataEvent { node: node.clone(), name: "cap.pcap".into(), data: b"b".to_vec() }))
            .await
            .unwrap();
        drop(tx);

        stage.run(rx, Some(out_tx)).await.unwrap();
        drop(stage);

        let mut refs = Vec::new();
        while let Some(event) = out_rx.recv().await {
            refs.push(event);
        }
        assert_eq!(refs.len(), 1);
        assert!(matches!(refs[0], Message::FileRef(_)));

        let written = tokio::fs::read(dir.path().join("cap.pcap")).await.unwrap();
        assert_eq!(written, b"ab");
    }
}
