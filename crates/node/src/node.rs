// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::NodeError;
use antler_core::{NodeId, PlatformTag};
use antler_launch::{BinaryRegistry, Launcher};
use antler_runner::{build_runner, Recorder, RunnerCtx};
use antler_tree::Run;
use antler_wire::{Message, RoutingFlag, Transport};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub enum CancelCause {
    Timeout,
    OperatorRequested,
    ParentClosed,
}

impl CancelCause {
    fn as_str(&self) -> &'static str {
        match self {
            CancelCause::Timeout => "timeout",
            CancelCause::OperatorRequested => "operator requested stop",
            CancelCause::ParentClosed => "parent connection closed",
        }
    }
}

/// Where to reach a child node: a launcher keyed by the node id it is
/// responsible for, plus the platform it should run on.
pub struct ChildSpec {
    pub node: NodeId,
    pub platform: PlatformTag,
    pub launcher: Arc<dyn Launcher>,
}

/// Runs one node's share of a Run tree: its own leaf runners, plus any
/// children it is responsible for launching and forwarding events from.
/// Interior mutability lets `Parallel` groups execute their branches
/// concurrently through shared `&Node` references.
pub struct Node {
    id: NodeId,
    recorder: Recorder,
    cancel: CancellationToken,
    runner_handles: Mutex<Vec<JoinHandle<()>>>,
    launchers: HashMap<NodeId, ChildSpec>,
    registry: Arc<BinaryRegistry>,
}

impl Node {
    pub fn new(id: NodeId, event_tx: mpsc::Sender<(RoutingFlag, Message)>, registry: Arc<BinaryRegistry>) -> Self {
        Node {
            id,
            recorder: Recorder::new(event_tx),
            cancel: CancellationToken::new(),
            runner_handles: Mutex::new(Vec::new()),
            launchers: HashMap::new(),
            registry,
        }
    }

    pub fn register_child(&mut self, spec: ChildSpec) {
        self.launchers.insert(spec.node.clone(), spec);
    }

    pub async fn execute(&self, run: &Run) -> Result<(), NodeError> {
        self.execute_inner(run).await?;
        let handles: Vec<_> = self.runner_handles.lock().await.drain(..).collect();
        for handle in handles {
            let _ = handle.await;
        }
        Ok(())
    }

    fn execute_inner<'a>(&'a self, run: &'a Run) -> Pin<Box<dyn Future<Output = Result<(), NodeError>> + Send + 'a>> {
        Box::pin(async move {
            match run {
                Run::Leaf(spec) => self.spawn_leaf(spec.clone()).await,
                Run::Serial(children) => {
                    for child in children {
                        self.execute_inner(child).await?;
                    }
                    Ok(())
                }
                Run::Parallel(children) => {
                    let branches = children.iter().map(|child| self.execute_inner(child));
                    let results: Vec<Result<(), NodeError>> = futures::future::join_all(branches).await;
                    results.into_iter().collect()
                }
                Run::Child { node, run } => self.launch_child(node, run).await,
            }
        })
    }

    async fn spawn_leaf(&self, spec: antler_tree::RunnerSpec) -> Result<(), NodeError> {
        let mut runner = match build_runner(spec) {
            Ok(runner) => runner,
            Err(err) => {
                warn!(error = %err, "refusing to run an unsupported leaf spec");
                let _ = self
                    .recorder
                    .emit(
                        RoutingFlag::FORWARD,
                        Message::Error(antler_wire::ErrorEvent { node: self.id.clone(), t: antler_core::Duration::ZERO, message: err.to_string(), flow: None }),
                    )
                    .await;
                return Ok(());
            }
        };
        let mut ctx = RunnerCtx::new(self.id.clone(), self.recorder.clone(), self.cancel.clone());
        let handle = tokio::spawn(async move {
            if let Err(err) = runner.run(&mut ctx).await {
                warn!(error = %err, "runner exited with an error");
            }
        });
        self.runner_handles.lock().await.push(handle);
        Ok(())
    }

    async fn launch_child(&self, node: &NodeId, run: &Run) -> Result<(), NodeError> {
        let spec = self.launchers.get(node).ok_or_else(|| NodeError::NoLauncher(node.clone()))?;
        info!(child = %node, "launching child node");

        let mut transport: Transport<_> = spec.launcher.launch(&spec.platform, &self.registry).await?;
        let run_json = serde_json::to_string(run)?;
        transport.send(RoutingFlag::PROCESS, &Message::StartRun { run_json }).await?;

        let recorder = self.recorder.clone();
        let cancel = self.cancel.clone();
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    received = transport.recv() => {
                        match received {
                            Ok((flag, message)) => {
                                if matches!(message, Message::Bye { .. }) {
                                    break;
                                }
                                if recorder.emit(flag, message).await.is_err() {
                                    break;
                                }
                            }
                            Err(_) => break,
                        }
                    }
                    _ = cancel.cancelled() => {
                        let cause = CancelCause::ParentClosed.as_str().to_string();
                        let _ = transport.send(RoutingFlag::PROCESS, &Message::Cancel { cause }).await;
                        break;
                    }
                }
            }
        });
        self.runner_handles.lock().await.push(handle);
        Ok(())
    }

    /// Cancels every runner and child this node owns.
    pub fn cancel(&self, cause: CancelCause) {
        info!(node = %self.id, cause = cause.as_str(), "canceling node");
        self.cancel.cancel();
    }
}

#[cfg(test)]
#[path = "node_tests.rs"]
mod tests;
