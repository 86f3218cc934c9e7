// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Re-encodes previously written result files through the codec registry's
//! external codec process. Runs after `SaveFiles` has closed every writer,
//! since a codec needs a complete file to read from.

use crate::error::ReportError;
use crate::reporter::{drain_and_forward, EventStream, EventTx, Reporter};
use antler_store::CodecRegistry;
use async_trait::async_trait;
use std::path::PathBuf;

/// Re-encodes `sources` (paths already written into the result directory)
/// into `dest` extensions the registry maps them to, e.g. `name.pcap` to
/// `name.pcap.gz`, removing the uncompressed source on success.
pub struct Encode<'r> {
    registry: &'r CodecRegistry,
    targets: Vec<(PathBuf, PathBuf)>,
}

impl<'r> Encode<'r> {
    pub fn new(registry: &'r CodecRegistry, targets: Vec<(PathBuf, PathBuf)>) -> Self {
        Encode { registry, targets }
    }
}

#[async_trait]
impl<'r> Reporter for Encode<'r> {
    async fn run(&mut self, rx: EventStream, tx: Option<EventTx>) -> Result<(), ReportError> {
        drain_and_forward(rx, tx).await;

        for (source, dest) in &self.targets {
            let bytes = tokio::fs::read(source).await.map_err(|e| antler_store::StoreError::io(source, e))?;
            self.registry.encode_to_file(dest, &bytes).await?;
            tokio::fs::remove_file(source).await.map_err(|e| antler_store::StoreError::io(source, e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn re_encodes_and_removes_the_plaintext_source() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("cap.pcap");
        tokio::fs::write(&source, b"packet bytes").await.unwrap();
        let dest = dir.path().join("cap.pcap.gz");

        let registry = CodecRegistry::new();
        let mut stage = Encode::new(&registry, vec![(source.clone(), dest.clone())]);
        let (tx, rx) = mpsc::channel(1);
        drop(tx);
        stage.run(rx, None).await.unwrap();

        assert!(!source.exists());
        assert!(dest.exists());
        let decoded = registry.decode_file(&dest).await.unwrap();
        assert_eq!(decoded, b"packet bytes");
    }
}
