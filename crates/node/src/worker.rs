// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The peer-side counterpart to `Node::launch_child`: what runs on a newly
//! launched node once its transport is up. Waits for `StartRun`, drives a
//! `Node` against the decoded tree, and reports `Bye` once it finishes or a
//! `Cancel` arrives.

use crate::error::NodeError;
use crate::node::{CancelCause, Node};
use antler_core::NodeId;
use antler_launch::BinaryRegistry;
use antler_tree::Run;
use antler_wire::{Message, RoutingFlag, Transport};
use futures::future::pending;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio::task::JoinError;
use tracing::{info, warn};

type RunFuture = Pin<Box<dyn Future<Output = Result<Result<(), NodeError>, JoinError>> + Send>>;

/// Drives one node's worker loop to completion: runs until the transport
/// closes or a `Bye` has been sent back.
pub async fn run_worker<S>(transport: Transport<S>, registry: Arc<BinaryRegistry>, node_id: NodeId)
where
    S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
{
    let (mut reader, mut writer) = transport.split();
    let (event_tx, mut event_rx) = mpsc::channel(8);
    let node = Arc::new(Node::new(node_id.clone(), event_tx.clone(), registry));

    let writer_task = tokio::spawn(async move {
        while let Some((flag, message)) = event_rx.recv().await {
            if writer.send(flag, &message).await.is_err() {
                break;
            }
        }
    });

    let mut run_future: RunFuture = Box::pin(pending());
    let mut running = false;

    loop {
        tokio::select! {
            received = reader.recv() => {
                match received {
                    Ok((_, Message::StartRun { run_json })) => {
                        match serde_json::from_str::<Run>(&run_json) {
                            Ok(run) => {
                                info!(node = %node_id, "starting run");
                                let node = node.clone();
                                let handle = tokio::spawn(async move { node.execute(&run).await });
                                run_future = Box::pin(handle);
                                running = true;
                            }
                            Err(err) => {
                                warn!(error = %err, "received an undecodable run tree");
                                let _ = event_tx.send((RoutingFlag::PROCESS, Message::Bye { error: Some(err.to_string()) })).await;
                                break;
                            }
                        }
                    }
                    Ok((_, Message::Cancel { cause })) => {
                        info!(node = %node_id, %cause, "canceling on parent request");
                        node.cancel(CancelCause::OperatorRequested);
                    }
                    Ok(_) => {}
                    Err(err) => {
                        warn!(node = %node_id, error = %err, "transport closed");
                        break;
                    }
                }
            }
            result = &mut run_future, if running => {
                let error = match result {
                    Ok(Ok(())) => None,
                    Ok(Err(err)) => Some(err.to_string()),
                    Err(join_err) => Some(format!("run task panicked: {join_err}")),
                };
                let _ = event_tx.send((RoutingFlag::PROCESS, Message::Bye { error })).await;
                break;
            }
        }
    }

    drop(event_tx);
    drop(node);
    let _ = writer_task.await;
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
