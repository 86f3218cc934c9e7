// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Spawns the worker entry point as a plain tokio task, connected to the
//! caller by an in-memory pair of pipes. No process boundary at all; used
//! for single-machine tests and for nodes colocated with the engine.

use crate::duplex::BoxedDuplex;
use crate::error::LaunchError;
use crate::launcher::Launcher;
use crate::registry::BinaryRegistry;
use antler_core::PlatformTag;
use antler_wire::Transport;
use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

type WorkerEntry = Arc<dyn Fn(BoxedDuplex) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Launches a worker in-process. The `entry` closure receives its end of
/// the duplex and is spawned on its own tokio task.
pub struct LocalLauncher {
    entry: WorkerEntry,
}

impl LocalLauncher {
    pub fn new<F, Fut>(entry: F) -> Self
    where
        F: Fn(BoxedDuplex) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        LocalLauncher { entry: Arc::new(move |duplex| Box::pin(entry(duplex))) }
    }
}

#[async_trait]
impl Launcher for LocalLauncher {
    async fn launch(
        &self,
        _platform: &PlatformTag,
        _registry: &BinaryRegistry,
    ) -> Result<Transport<BoxedDuplex>, LaunchError> {
        let (here, there) = tokio::io::duplex(64 * 1024);
        let entry = self.entry.clone();
        tokio::spawn(async move {
            entry(Box::new(there)).await;
        });
        Ok(Transport::new(Box::new(here)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use antler_wire::{Message, RoutingFlag};

    #[tokio::test]
    async fn launched_worker_echoes_a_start_run_message() {
        let launcher = LocalLauncher::new(|duplex| async move {
            let mut transport = Transport::new(duplex);
            if let Ok((flag, message)) = transport.recv().await {
                let _ = transport.send(flag, &message).await;
            }
        });

        let registry = BinaryRegistry::new();
        let mut transport = launcher.launch(&PlatformTag::from("any"), &registry).await.unwrap();

        transport.send(RoutingFlag::PROCESS, &Message::StartRun { run_json: String::new() }).await.unwrap();
        let (flag, message) = transport.recv().await.unwrap();
        assert_eq!(flag, RoutingFlag::PROCESS);
        assert_eq!(message, Message::StartRun { run_json: String::new() });
    }
}
