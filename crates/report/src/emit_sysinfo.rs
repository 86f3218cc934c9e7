// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Renders each node's `SysInfoData` into one workspace file per node.

use crate::error::ReportError;
use crate::reporter::{EventStream, EventTx, Reporter};
use antler_store::Workspace;
use antler_wire::Message;
use async_trait::async_trait;

pub struct EmitSysInfo<'w> {
    workspace: &'w Workspace,
}

impl<'w> EmitSysInfo<'w> {
    pub fn new(workspace: &'w Workspace) -> Self {
        EmitSysInfo { workspace }
    }
}

#[async_trait]
impl<'w> Reporter for EmitSysInfo<'w> {
    async fn run(&mut self, mut rx: EventStream, tx: Option<EventTx>) -> Result<(), ReportError> {
        while let Some(event) = rx.recv().await {
            if let Message::SysInfoData(ref info) = event {
                let rendered = serde_json::to_vec_pretty(info)?;
                let name = format!("sysinfo-{}.json", info.node);
                let mut writer = self.workspace.create_writer(&name).await?;
                writer.write(&rendered).await?;
                writer.close().await?;
            }
            if let Some(tx) = &tx {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use antler_core::NodeId;
    use antler_wire::SysInfoDataEvent;
    use std::collections::HashMap;
    use tempfile::tempdir;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn writes_one_file_per_node() {
        let dir = tempdir().unwrap();
        let workspace = Workspace::create(dir.path(), None).await.unwrap();
        let mut stage = EmitSysInfo::new(&workspace);

        let (tx, rx) = mpsc::channel(8);
        tx.send(Message::SysInfoData(SysInfoDataEvent {
            node: NodeId::from("server"),
            hostname: "host-1".into(),
            kernel: "6.1.0".into(),
            env: HashMap::new(),
            sysctls: HashMap::new(),
            commands: HashMap::new(),
        }))
        .await
        .unwrap();
        drop(tx);

        stage.run(rx, None).await.unwrap();

        let contents = tokio::fs::read_to_string(dir.path().join("sysinfo-server.json")).await.unwrap();
        assert!(contents.contains("host-1"));
    }
}
