// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::ctx::RunnerCtx;
use crate::error::RunnerError;
use crate::packet_runner::{PacketClientRunner, PacketServerRunner};
use crate::sleep_runner::SleepRunner;
use crate::stream_runner::{StreamClientRunner, StreamServerRunner};
use crate::system_runner::SystemRunner;
use antler_tree::RunnerSpec;
use async_trait::async_trait;

/// The one contract every leaf workload implements: run to completion or
/// until canceled, optionally registering a canceler, emitting events
/// through the context's recorder as it goes.
#[async_trait]
pub trait Runner: Send {
    async fn run(&mut self, ctx: &mut RunnerCtx) -> Result<(), RunnerError>;
}

/// Builds the concrete runner for a leaf spec. Lives here rather than in
/// `antler-tree` because only this crate knows how to execute a spec.
pub fn build_runner(spec: RunnerSpec) -> Result<Box<dyn Runner>, RunnerError> {
    match spec {
        RunnerSpec::StreamServer { endpoint } => Ok(Box::new(StreamServerRunner::new(endpoint))),
        RunnerSpec::StreamClient { endpoint, duration, sample_interval } => {
            Ok(Box::new(StreamClientRunner::new(endpoint, duration, sample_interval)))
        }
        RunnerSpec::PacketServer { endpoint } => Ok(Box::new(PacketServerRunner::new(endpoint))),
        RunnerSpec::PacketClient { endpoint, schedule } => {
            Ok(Box::new(PacketClientRunner::new(endpoint, schedule)?))
        }
        RunnerSpec::System { command } => Ok(Box::new(SystemRunner::new(command))),
        RunnerSpec::Sleep { duration } => Ok(Box::new(SleepRunner::new(duration))),
    }
}
