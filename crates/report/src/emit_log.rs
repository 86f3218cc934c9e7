// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Writes `LogEntry` records to configured sinks, optionally buffering and
//! sorting by node-relative time before emit so a reader sees events in
//! time order even though nodes interleave on the wire.

use crate::error::ReportError;
use crate::reporter::{EventStream, EventTx, Reporter};
use antler_wire::{LogEntryEvent, Message};
use async_trait::async_trait;
use std::io::Write;

pub struct EmitLog<W: Write + Send> {
    sink: W,
    sort_before_emit: bool,
    buffered: Vec<LogEntryEvent>,
}

impl<W: Write + Send> EmitLog<W> {
    pub fn new(sink: W, sort_before_emit: bool) -> Self {
        EmitLog { sink, sort_before_emit, buffered: Vec::new() }
    }

    fn write_entry(&mut self, entry: &LogEntryEvent) -> Result<(), ReportError> {
        writeln!(self.sink, "[{}] {}: {}", entry.t, entry.node, entry.message)
            .map_err(|e| ReportError::Store(antler_store::StoreError::io("<log sink>", e)))
    }
}

#[async_trait]
impl<W: Write + Send> Reporter for EmitLog<W> {
    async fn run(&mut self, mut rx: EventStream, tx: Option<EventTx>) -> Result<(), ReportError> {
        while let Some(event) = rx.recv().await {
            if let Message::LogEntry(ref entry) = event {
                if self.sort_before_emit {
                    self.buffered.push(entry.clone());
                } else {
                    self.write_entry(entry)?;
                }
            }
            if let Some(tx) = &tx {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
        }

        if self.sort_before_emit {
            self.buffered.sort_by_key(|entry| entry.t);
            for entry in std::mem::take(&mut self.buffered) {
                self.write_entry(&entry)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use antler_core::{Duration, NodeId};
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn sorts_log_entries_by_time_when_configured() {
        let mut sink = Vec::new();
        {
            let mut stage = EmitLog::new(&mut sink, true);
            let (tx, rx) = mpsc::channel(8);
            let node = NodeId::from("client");
            tx.send(Message::LogEntry(LogEntryEvent { node: node.clone(), t: Duration::from_nanos(200), message: "second".into() }))
                .await
                .unwrap();
            tx.send(Message::LogEntry(LogEntryEvent { node, t: Duration::from_nanos(100), message: "first".into() }))
                .await
                .unwrap();
            drop(tx);
            stage.run(rx, None).await.unwrap();
        }

        let rendered = String::from_utf8(sink).unwrap();
        let first = rendered.find("first").unwrap();
        let second = rendered.find("second").unwrap();
        assert!(first < second);
    }
}
