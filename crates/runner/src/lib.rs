// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! antler-runner: the five leaf workloads (stream client/server, packet
//! client/server, system command, sleeper) that actually produce events.

mod ctx;
mod error;
mod packet_codec;
mod packet_runner;
mod recorder;
mod runner;
mod sleep_runner;
mod stream_runner;
mod system_runner;

pub use ctx::RunnerCtx;
pub use error::RunnerError;
pub use packet_codec::{PacketHeader, PACKET_MAGIC};
pub use packet_runner::{PacketClientRunner, PacketServerRunner};
pub use recorder::Recorder;
pub use runner::{build_runner, Runner};
pub use sleep_runner::SleepRunner;
pub use stream_runner::{StreamClientRunner, StreamServerRunner};
pub use system_runner::SystemRunner;
