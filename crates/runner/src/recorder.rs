// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::RunnerError;
use antler_wire::{Message, RoutingFlag};
use tokio::sync::mpsc;

/// The sink every runner emits events through. A thin wrapper over a
/// bounded channel so backpressure reaches the runner directly instead of
/// buffering unboundedly in front of a slow reporter.
#[derive(Clone)]
pub struct Recorder {
    tx: mpsc::Sender<(RoutingFlag, Message)>,
}

impl Recorder {
    pub fn new(tx: mpsc::Sender<(RoutingFlag, Message)>) -> Self {
        Recorder { tx }
    }

    pub async fn emit(&self, flag: RoutingFlag, message: Message) -> Result<(), RunnerError> {
        self.tx.send((flag, message)).await.map_err(|_| RunnerError::RecorderClosed)
    }
}
