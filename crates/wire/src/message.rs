// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The closed set of tagged messages a transport carries: control messages,
//! the executable-transfer chunk, and the data events a node reports.

use antler_core::{Duration, FlowId, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One per flow per side: records the node's `Tinit` epoch and whether the
/// emitter is the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamInfoEvent {
    pub flow: FlowId,
    pub node: NodeId,
    pub server: bool,
    pub tinit_epoch_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacketInfoEvent {
    pub flow: FlowId,
    pub node: NodeId,
    pub server: bool,
    pub tinit_epoch_ms: u64,
}

/// A per-byte-window sample. `t` is relative to the emitter's `Tinit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamIoEvent {
    pub flow: FlowId,
    pub t: Duration,
    pub sent: bool,
    pub total_bytes: u64,
}

/// A per-packet record; additionally carries a sequence number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacketIoEvent {
    pub flow: FlowId,
    pub t: Duration,
    pub sent: bool,
    pub seq: u64,
    pub length: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TcpInfoEvent {
    pub flow: FlowId,
    pub t: Duration,
    pub cwnd: u32,
    pub rtt_us: u32,
    pub retransmits: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntryEvent {
    pub node: NodeId,
    pub t: Duration,
    pub message: String,
}

/// Errors are data, not out-of-band: a partial run still produces a
/// coherent report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub node: NodeId,
    pub t: Duration,
    pub message: String,
    #[serde(default)]
    pub flow: Option<FlowId>,
}

/// A named, append-only byte chunk belonging to a named file on the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileDataEvent {
    pub node: NodeId,
    pub name: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SysInfoDataEvent {
    pub node: NodeId,
    pub hostname: String,
    pub kernel: String,
    pub env: HashMap<String, String>,
    pub sysctls: HashMap<String, String>,
    pub commands: HashMap<String, String>,
}

/// Emitted by the save-files stage once a named file becomes part of the
/// result set, even after its chunks were consumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRefEvent {
    pub node: NodeId,
    pub name: String,
}

/// The closed set of messages a transport link carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    /// `run_json` is a serialized `antler_tree::Run`. Kept as an opaque
    /// string here so this crate never depends on the tree crate.
    StartRun { run_json: String },
    Cancel { cause: String },
    Bye { error: Option<String> },
    ExecChunk { bytes: Vec<u8>, offset: u64, total: u64 },

    StreamInfo(StreamInfoEvent),
    PacketInfo(PacketInfoEvent),
    StreamIo(StreamIoEvent),
    PacketIo(PacketIoEvent),
    TcpInfo(TcpInfoEvent),
    LogEntry(LogEntryEvent),
    Error(ErrorEvent),
    FileData(FileDataEvent),
    SysInfoData(SysInfoDataEvent),
    FileRef(FileRefEvent),
}

impl Message {
    /// The flow this message belongs to, when applicable.
    pub fn flow(&self) -> Option<&FlowId> {
        match self {
            Message::StreamInfo(e) => Some(&e.flow),
            Message::PacketInfo(e) => Some(&e.flow),
            Message::StreamIo(e) => Some(&e.flow),
            Message::PacketIo(e) => Some(&e.flow),
            Message::TcpInfo(e) => Some(&e.flow),
            Message::Error(e) => e.flow.as_ref(),
            _ => None,
        }
    }

    pub fn is_event(&self) -> bool {
        !matches!(self, Message::StartRun { .. } | Message::Cancel { .. } | Message::Bye { .. } | Message::ExecChunk { .. })
    }
}
