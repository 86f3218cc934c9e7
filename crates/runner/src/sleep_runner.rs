// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::ctx::RunnerCtx;
use crate::error::RunnerError;
use crate::runner::Runner;
use antler_core::Duration;
use async_trait::async_trait;

/// Blocks for a configured duration or until canceled, whichever comes
/// first. Emits nothing.
pub struct SleepRunner {
    duration: Duration,
}

impl SleepRunner {
    pub fn new(duration: Duration) -> Self {
        SleepRunner { duration }
    }
}

#[async_trait]
impl Runner for SleepRunner {
    async fn run(&mut self, ctx: &mut RunnerCtx) -> Result<(), RunnerError> {
        tokio::select! {
            _ = tokio::time::sleep(self.duration.into()) => Ok(()),
            _ = ctx.cancel.cancelled() => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::Recorder;
    use tokio_util::sync::CancellationToken;

    #[tokio::test]
    async fn sleep_returns_early_on_cancellation() {
        let (tx, _rx) = tokio::sync::mpsc::channel(8);
        let cancel = CancellationToken::new();
        let mut ctx = RunnerCtx::new(antler_core::NodeId::from("test"), Recorder::new(tx), cancel.clone());

        let mut runner = SleepRunner::new(Duration::from_nanos(60_000_000_000));
        cancel.cancel();

        let started = tokio::time::Instant::now();
        runner.run(&mut ctx).await.unwrap();
        assert!(started.elapsed() < std::time::Duration::from_secs(1));
    }
}
