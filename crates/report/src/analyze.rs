// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Accumulates a Test's events and, at input-close, computes per-stream
//! goodput windows, flow-completion time, and one-way delay for packet
//! flows. Every node's clock is reconciled to the earliest observed
//! `Tinit` across the Test before any cross-node comparison (an OWD point)
//! is produced.
//!
//! `Message` is the closed set of events the wire carries, so it has no
//! variant for an analysis result. Rather than growing the wire protocol
//! for a report-only artifact, `Analyze` writes its summary into a shared
//! slot the chart stages read once `Analyze` has returned, and otherwise
//! behaves like any other stage: it forwards every event it doesn't need.

use crate::error::ReportError;
use crate::reporter::{EventStream, EventTx, Reporter};
use antler_core::{ByteCount, Duration, FlowId};
use antler_wire::Message;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct GoodputWindow {
    pub t: Duration,
    pub bits_per_sec: f64,
}

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct OwdPoint {
    pub seq: u64,
    pub delay: Duration,
}

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct FlowSummary {
    pub goodput: Vec<GoodputWindow>,
    pub completion_time: Option<Duration>,
    pub owd: Vec<OwdPoint>,
}

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct AnalyzeSummary {
    pub flows: HashMap<FlowId, FlowSummary>,
}

pub type AnalyzeSlot = Arc<Mutex<Option<AnalyzeSummary>>>;

#[derive(Default)]
struct FlowAccum {
    last_stream_sample: Option<(Duration, ByteCount)>,
    sent_seq_times: HashMap<u64, Duration>,
    summary: FlowSummary,
}

pub struct Analyze {
    slot: AnalyzeSlot,
    tinit_by_node: HashMap<antler_core::NodeId, u64>,
    flows: HashMap<FlowId, FlowAccum>,
}

impl Analyze {
    pub fn new(slot: AnalyzeSlot) -> Self {
        Analyze { slot, tinit_by_node: HashMap::new(), flows: HashMap::new() }
    }

    fn offset_for(&self, node: &antler_core::NodeId) -> i64 {
        let earliest = self.tinit_by_node.values().min().copied().unwrap_or(0);
        let node_epoch = self.tinit_by_node.get(node).copied().unwrap_or(earliest);
        node_epoch as i64 - earliest as i64
    }

    fn shift(&self, node: &antler_core::NodeId, t: Duration) -> Duration {
        let offset_ms = self.offset_for(node);
        if offset_ms >= 0 {
            Duration::from_nanos(t.as_nanos().saturating_add(offset_ms as u64 * 1_000_000))
        } else {
            Duration::from_nanos(t.as_nanos().saturating_sub((-offset_ms) as u64 * 1_000_000))
        }
    }

    fn record_stream_io(&mut self, flow: &FlowId, t: Duration, sent: bool, total_bytes: ByteCount) {
        let accum = self.flows.entry(flow.clone()).or_default();
        let completed = accum.summary.completion_time;
        accum.summary.completion_time = Some(completed.map_or(t, |prior| prior.max(t)));

        if sent {
            if let Some((prev_t, prev_bytes)) = accum.last_stream_sample {
                let dt = t.saturating_sub(prev_t);
                let dbytes = total_bytes.0.saturating_sub(prev_bytes.0);
                let bitrate = antler_core::Bitrate::from_bytes_over(ByteCount(dbytes), dt);
                accum.summary.goodput.push(GoodputWindow { t, bits_per_sec: bitrate.0 });
            }
            accum.last_stream_sample = Some((t, total_bytes));
        }
    }

    fn record_packet_io(&mut self, flow: &FlowId, node: &antler_core::NodeId, t: Duration, sent: bool, seq: u64) {
        let t = self.shift(node, t);
        let accum = self.flows.entry(flow.clone()).or_default();
        let completed = accum.summary.completion_time;
        accum.summary.completion_time = Some(completed.map_or(t, |prior| prior.max(t)));

        if sent {
            accum.sent_seq_times.entry(seq).or_insert(t);
        } else if let Some(sent_t) = accum.sent_seq_times.remove(&seq) {
            accum.summary.owd.push(OwdPoint { seq, delay: t.saturating_sub(sent_t) });
        }
    }
}

#[async_trait]
impl Reporter for Analyze {
    async fn run(&mut self, mut rx: EventStream, tx: Option<EventTx>) -> Result<(), ReportError> {
        while let Some(event) = rx.recv().await {
            match &event {
                Message::StreamInfo(info) => {
                    self.tinit_by_node.insert(info.node.clone(), info.tinit_epoch_ms);
                }
                Message::PacketInfo(info) => {
                    self.tinit_by_node.insert(info.node.clone(), info.tinit_epoch_ms);
                }
                Message::StreamIo(io) => {
                    self.record_stream_io(&io.flow, io.t, io.sent, ByteCount(io.total_bytes));
                }
                Message::PacketIo(io) => {
                    // PacketIoEvent carries no node, but OWD only needs the
                    // flow's already-registered offset, which is keyed by
                    // node via StreamInfo/PacketInfo. Packet flows report a
                    // single offset since client and server share a flow.
                    let node = self.tinit_by_node.keys().next().cloned().unwrap_or_else(|| antler_core::NodeId::new(""));
                    self.record_packet_io(&io.flow, &node, io.t, io.sent, io.seq);
                }
                _ => {}
            }

            if let Some(tx) = &tx {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
        }

        let flows = std::mem::take(&mut self.flows).into_iter().map(|(flow, accum)| (flow, accum.summary)).collect();
        *self.slot.lock().expect("analyze slot poisoned") = Some(AnalyzeSummary { flows });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use antler_core::NodeId;
    use antler_wire::{PacketInfoEvent, PacketIoEvent};
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn joins_sent_and_received_packets_into_owd_points() {
        let slot: AnalyzeSlot = Arc::new(Mutex::new(None));
        let mut stage = Analyze::new(slot.clone());
        let (tx, rx) = mpsc::channel(8);
        let flow = FlowId::from("ping");
        let node = NodeId::from("client");

        tx.send(Message::PacketInfo(PacketInfoEvent { flow: flow.clone(), node: node.clone(), server: false, tinit_epoch_ms: 1000 }))
            .await
            .unwrap();
        tx.send(Message::PacketIo(PacketIoEvent { flow: flow.clone(), t: Duration::from_nanos(10), sent: true, seq: 1, length: 64 }))
            .await
            .unwrap();
        tx.send(Message::PacketIo(PacketIoEvent { flow: flow.clone(), t: Duration::from_nanos(30), sent: false, seq: 1, length: 64 }))
            .await
            .unwrap();
        drop(tx);

        stage.run(rx, None).await.unwrap();

        let summary = slot.lock().unwrap().clone().unwrap();
        let flow_summary = summary.flows.get(&flow).unwrap();
        assert_eq!(flow_summary.owd.len(), 1);
        assert_eq!(flow_summary.owd[0].delay, Duration::from_nanos(20));
    }
}
