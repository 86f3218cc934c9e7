// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The four terminal stages every pipeline bottoms out at: `writeData` and
//! `appendData` persist a "during" pipeline's events for later replay,
//! `readData` and `rangeData` are the head of the "after" pipeline that
//! replays them. These aren't part of the public stage catalogue — the
//! engine builds them directly when it assembles a Test's two pipelines.

use crate::error::ReportError;
use crate::reporter::{drain_and_forward, EventStream, EventTx, Reporter};
use antler_store::Writer;
use antler_wire::Message;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Events buffered in memory across a Test's during/after split, when no
/// data-file name was configured.
pub type EventBuffer = Arc<Mutex<Vec<Message>>>;

/// Persists every event to a workspace file as a stream of
/// `u32`-length-prefixed bincode records. Holds the writer as an `Option`
/// so it can be taken and closed once the input stream ends, finalizing
/// the file into the workspace.
pub struct WriteData {
    writer: Option<Writer>,
}

impl WriteData {
    pub fn new(writer: Writer) -> Self {
        WriteData { writer: Some(writer) }
    }
}

#[async_trait]
impl Reporter for WriteData {
    async fn run(&mut self, mut rx: EventStream, tx: Option<EventTx>) -> Result<(), ReportError> {
        let mut writer = self.writer.take().expect("WriteData::run called more than once");
        while let Some(event) = rx.recv().await {
            let record = bincode::serialize(&event)?;
            writer.write(&(record.len() as u32).to_be_bytes()).await?;
            writer.write(&record).await?;
            if let Some(tx) = &tx {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
        }
        writer.close().await?;
        Ok(())
    }
}

/// Buffers every event into `buffer`, for Tests with no configured
/// data-file name.
pub struct AppendData {
    buffer: EventBuffer,
}

impl AppendData {
    pub fn new(buffer: EventBuffer) -> Self {
        AppendData { buffer }
    }
}

#[async_trait]
impl Reporter for AppendData {
    async fn run(&mut self, mut rx: EventStream, tx: Option<EventTx>) -> Result<(), ReportError> {
        while let Some(event) = rx.recv().await {
            self.buffer.lock().expect("event buffer lock poisoned").push(event.clone());
            if let Some(tx) = &tx {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
        }
        Ok(())
    }
}

/// Re-reads a `WriteData` file and re-emits its records onto `tx`, driving
/// the head of an "after" pipeline.
pub async fn read_data(mut reader: impl tokio::io::AsyncRead + Unpin, tx: EventTx) -> Result<(), ReportError> {
    loop {
        let mut len_bytes = [0u8; 4];
        if let Err(e) = reader.read_exact(&mut len_bytes).await {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                return Ok(());
            }
            return Err(ReportError::Store(antler_store::StoreError::io("<data file>", e)));
        }
        let len = u32::from_be_bytes(len_bytes) as usize;
        let mut record = vec![0u8; len];
        reader.read_exact(&mut record).await.map_err(|e| ReportError::Store(antler_store::StoreError::io("<data file>", e)))?;
        let event: Message = bincode::deserialize(&record)?;
        if tx.send(event).await.is_err() {
            return Ok(());
        }
    }
}

/// Re-emits a previously buffered set of in-memory events onto `tx`, driving
/// the head of an "after" pipeline when no data-file was configured.
pub async fn range_data(buffer: EventBuffer, tx: EventTx) -> Result<(), ReportError> {
    let events = buffer.lock().expect("event buffer lock poisoned").clone();
    for event in events {
        if tx.send(event).await.is_err() {
            break;
        }
    }
    Ok(())
}

/// A no-op stage that simply forwards; used in tests and as scaffolding for
/// pipelines that have no real terminal consumer.
pub struct PassThrough;

#[async_trait]
impl Reporter for PassThrough {
    async fn run(&mut self, rx: EventStream, tx: Option<EventTx>) -> Result<(), ReportError> {
        drain_and_forward(rx, tx).await;
        Ok(())
    }
}
