// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stream runners: a server that accepts connections forever and a client
//! that dials, negotiates a flow identifier, and transfers bytes for a
//! configured duration, sampling time/total-bytes pairs and kernel socket
//! state along the way.

use crate::ctx::RunnerCtx;
use crate::error::RunnerError;
use crate::runner::Runner;
use antler_core::{Clock, FlowId, NodeId, SystemClock, Tinit};
use antler_tree::StreamEndpoint;
use antler_wire::{Message, RoutingFlag, StreamInfoEvent, StreamIoEvent, TcpInfoEvent};
use async_trait::async_trait;
use nix::sys::socket::{getsockopt, setsockopt, sockopt};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tracing::warn;

const SAMPLE_CHUNK: usize = 64 * 1024;

pub struct StreamServerRunner {
    endpoint: StreamEndpoint,
}

impl StreamServerRunner {
    pub fn new(endpoint: StreamEndpoint) -> Self {
        StreamServerRunner { endpoint }
    }
}

#[async_trait]
impl Runner for StreamServerRunner {
    async fn run(&mut self, ctx: &mut RunnerCtx) -> Result<(), RunnerError> {
        let listener = TcpListener::bind(&self.endpoint.address).await?;
        let local_addr = listener.local_addr()?;
        ctx.register_canceler(move || {
            // Dropping the listener on the node's cancellation path is
            // handled by the join-handle abort; binding a fresh probe
            // connection here would only wake one pending accept().
            let _ = local_addr;
        });

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (socket, _) = accepted?;
                    let recorder = ctx.recorder.clone();
                    let node = ctx.node.clone();
                    let clock = SystemClock;
                    tokio::spawn(async move {
                        let _ = serve_connection(socket, node, recorder, clock).await;
                    });
                }
                _ = ctx.cancel.cancelled() => return Ok(()),
            }
        }
    }
}

async fn serve_connection(
    mut socket: TcpStream,
    node: NodeId,
    recorder: crate::recorder::Recorder,
    clock: impl Clock,
) -> Result<(), RunnerError> {
    let tinit = Tinit::sample(&clock);
    let flow = FlowId::from(socket.peer_addr().map(|a| a.to_string()).unwrap_or_default().as_str());

    recorder
        .emit(
            RoutingFlag::FORWARD,
            Message::StreamInfo(StreamInfoEvent { flow: flow.clone(), node, server: true, tinit_epoch_ms: tinit.epoch_ms() }),
        )
        .await?;

    let mut buf = vec![0u8; SAMPLE_CHUNK];
    let mut total = 0u64;
    use tokio::io::AsyncReadExt;
    loop {
        let n = socket.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        total += n as u64;
        recorder
            .emit(
                RoutingFlag::FORWARD,
                Message::StreamIo(StreamIoEvent { flow: flow.clone(), t: tinit.elapsed(&clock), sent: false, total_bytes: total }),
            )
            .await?;
    }
    Ok(())
}

/// Applies the configured congestion-control algorithm to a connected
/// socket. A failure (unknown algorithm, kernel module not loaded) is
/// logged and otherwise ignored; this is a best-effort knob, not a
/// correctness requirement for the transfer itself.
fn apply_congestion_control(socket: &TcpStream, algorithm: &str) {
    if let Err(err) = setsockopt(socket, sockopt::TcpCongestion, &std::ffi::OsString::from(algorithm)) {
        warn!(algorithm, %err, "failed to set congestion control algorithm");
    }
}

/// Samples `TCP_INFO` off a connected socket, logging and swallowing any
/// error the way `apply_congestion_control` does.
fn sample_tcp_info(socket: &TcpStream) -> Option<(u32, u32, u32)> {
    match getsockopt(socket, sockopt::TcpInfo) {
        Ok(info) => Some((info.tcpi_snd_cwnd, info.tcpi_rtt, info.tcpi_total_retrans)),
        Err(err) => {
            warn!(%err, "failed to read tcp_info");
            None
        }
    }
}

pub struct StreamClientRunner {
    endpoint: StreamEndpoint,
    duration: antler_core::Duration,
    sample_interval: antler_core::Duration,
}

impl StreamClientRunner {
    pub fn new(endpoint: StreamEndpoint, duration: antler_core::Duration, sample_interval: antler_core::Duration) -> Self {
        StreamClientRunner { endpoint, duration, sample_interval }
    }
}

#[async_trait]
impl Runner for StreamClientRunner {
    async fn run(&mut self, ctx: &mut RunnerCtx) -> Result<(), RunnerError> {
        let mut socket = TcpStream::connect(&self.endpoint.address).await?;
        if let Some(algorithm) = &self.endpoint.congestion_control {
            apply_congestion_control(&socket, algorithm);
        }
        let clock = SystemClock;
        let tinit = Tinit::sample(&clock);
        let flow = FlowId::from(socket.local_addr().map(|a| a.to_string()).unwrap_or_default().as_str());

        ctx.recorder
            .emit(
                RoutingFlag::FORWARD,
                Message::StreamInfo(StreamInfoEvent {
                    flow: flow.clone(),
                    node: ctx.node.clone(),
                    server: false,
                    tinit_epoch_ms: tinit.epoch_ms(),
                }),
            )
            .await?;

        let buf = vec![0u8; SAMPLE_CHUNK];
        let mut total = 0u64;
        let deadline = tokio::time::Instant::now() + std::time::Duration::from(self.duration);
        let mut sample_at = tokio::time::Instant::now() + std::time::Duration::from(self.sample_interval);

        loop {
            tokio::select! {
                write_result = socket.write_all(&buf) => {
                    write_result?;
                    total += buf.len() as u64;
                }
                _ = ctx.cancel.cancelled() => break,
                _ = tokio::time::sleep_until(deadline) => break,
            }

            if tokio::time::Instant::now() >= sample_at {
                let t = tinit.elapsed(&clock);
                ctx.recorder
                    .emit(RoutingFlag::FORWARD, Message::StreamIo(StreamIoEvent { flow: flow.clone(), t, sent: true, total_bytes: total }))
                    .await?;
                if let Some((cwnd, rtt_us, retransmits)) = sample_tcp_info(&socket) {
                    ctx.recorder
                        .emit(RoutingFlag::FORWARD, Message::TcpInfo(TcpInfoEvent { flow: flow.clone(), t, cwnd, rtt_us, retransmits }))
                        .await?;
                }
                sample_at = tokio::time::Instant::now() + std::time::Duration::from(self.sample_interval);
            }
        }

        let _ = socket.shutdown().await;
        Ok(())
    }
}
