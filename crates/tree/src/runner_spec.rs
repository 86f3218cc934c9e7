// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration for the five leaf workloads. These types only describe
//! *what* to run; `antler-runner` owns the execution.

use antler_core::Duration;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamEndpoint {
    pub address: String,
    #[serde(default)]
    pub congestion_control: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacketEndpoint {
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemCommand {
    pub argv: Vec<String>,
    #[serde(default)]
    pub env: HashMap<String, String>,
    #[serde(default)]
    pub stdout_file: Option<String>,
    #[serde(default)]
    pub stderr_file: Option<String>,
    #[serde(default)]
    pub background: bool,
}

/// How a packet client schedules the gap before each send, or the length of
/// each payload. Both axes share this policy shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum WaitPolicy {
    Sequential { values_ms: Vec<u64>, #[serde(default)] lead_ms: Option<u64> },
    UniformRandom { values_ms: Vec<u64>, #[serde(default)] lead_ms: Option<u64> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum LengthPolicy {
    Sequential { values: Vec<u32> },
    UniformRandom { values: Vec<u32> },
}

/// An open extension point: only `Unresponsive` is implemented. Any other
/// tag still deserializes, but the client refuses to run it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum SenderSchedule {
    Unresponsive {
        wait: WaitPolicy,
        length: LengthPolicy,
        duration: Duration,
        /// Requests an echo reply from the server for every packet sent.
        /// Replies are recorded but never affect the sender's own cadence.
        #[serde(default)]
        echo: bool,
    },
    #[serde(other)]
    Unimplemented,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum RunnerSpec {
    StreamServer { endpoint: StreamEndpoint },
    StreamClient { endpoint: StreamEndpoint, duration: Duration, sample_interval: Duration },
    PacketServer { endpoint: PacketEndpoint },
    PacketClient { endpoint: PacketEndpoint, schedule: SenderSchedule },
    System { command: SystemCommand },
    Sleep { duration: Duration },
}
