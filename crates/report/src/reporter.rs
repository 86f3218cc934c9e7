// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::ReportError;
use antler_wire::Message;
use async_trait::async_trait;
use tokio::sync::mpsc;

pub type EventStream = mpsc::Receiver<Message>;
pub type EventTx = mpsc::Sender<Message>;

/// One stage in a Test's report pipeline. A stage reads events from `rx`
/// until it closes, does its own work, and forwards whatever it doesn't
/// consume to `tx` when one is given — the last stage in a chain gets
/// `None` and is free to be purely a sink.
#[async_trait]
pub trait Reporter: Send {
    async fn run(&mut self, rx: EventStream, tx: Option<EventTx>) -> Result<(), ReportError>;
}

/// Forwards every remaining event from `rx` to `tx` untouched. Every stage
/// calls this on its early-return paths (an error, a cancellation) so a
/// downstream stage never silently misses events a failed stage already
/// pulled off the channel.
pub async fn drain_and_forward(mut rx: EventStream, tx: Option<EventTx>) {
    let Some(tx) = tx else { return };
    while let Some(event) = rx.recv().await {
        if tx.send(event).await.is_err() {
            break;
        }
    }
}
