// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The hidden `worker` entry point: what a namespace- or remote-launched
//! peer actually runs once its embedded binary execs. Its stdio is the
//! transport duplex the launcher on the other end wired up.

use antler_core::NodeId;
use antler_launch::BinaryRegistry;
use antler_node::run_worker;
use antler_wire::Transport;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf, Stdin, Stdout};

struct StdioDuplex {
    stdin: Stdin,
    stdout: Stdout,
}

impl AsyncRead for StdioDuplex {
    fn poll_read(mut self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.stdin).poll_read(cx, buf)
    }
}

impl AsyncWrite for StdioDuplex {
    fn poll_write(mut self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<std::io::Result<usize>> {
        Pin::new(&mut self.stdout).poll_write(cx, buf)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.stdout).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.stdout).poll_shutdown(cx)
    }
}

/// Runs this process as a worker node: reads its parent's `StartRun` and
/// `Cancel` control messages from stdin, writes events back on stdout,
/// exits once `run_worker` sends its final `Bye`.
pub async fn main(node_id: String, registry: Arc<BinaryRegistry>) {
    let duplex = StdioDuplex { stdin: tokio::io::stdin(), stdout: tokio::io::stdout() };
    let transport = Transport::new(duplex);
    run_worker(transport, registry, NodeId::from(node_id)).await;
}
