// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Packet runners: a server recording `PacketIo` for each datagram and
//! echoing back ones that requested it, and a client composing one sender
//! loop per configured send schedule plus a receiver task for replies.

use crate::ctx::RunnerCtx;
use crate::error::RunnerError;
use crate::packet_codec::PacketHeader;
use crate::runner::Runner;
use antler_core::{Clock, FlowId, SystemClock, Tinit};
use antler_tree::{LengthPolicy, PacketEndpoint, SenderSchedule, WaitPolicy};
use antler_wire::{Message, PacketInfoEvent, PacketIoEvent, RoutingFlag};
use async_trait::async_trait;
use parking_lot::Mutex;
use rand::Rng;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::net::UdpSocket;

const MAX_DATAGRAM: usize = 2048;

pub struct PacketServerRunner {
    endpoint: PacketEndpoint,
}

impl PacketServerRunner {
    pub fn new(endpoint: PacketEndpoint) -> Self {
        PacketServerRunner { endpoint }
    }
}

#[async_trait]
impl Runner for PacketServerRunner {
    async fn run(&mut self, ctx: &mut RunnerCtx) -> Result<(), RunnerError> {
        let socket = UdpSocket::bind(&self.endpoint.address).await?;
        let clock = SystemClock;
        let tinit = Tinit::sample(&clock);
        let mut buf = [0u8; MAX_DATAGRAM];
        let mut seen_flows = HashSet::new();

        loop {
            tokio::select! {
                received = socket.recv_from(&mut buf) => {
                    let (n, peer) = received?;
                    let header = PacketHeader::decode(&buf[..n])?;
                    let flow = FlowId::from(header.flow.as_str());

                    if seen_flows.insert(flow.clone()) {
                        ctx.recorder
                            .emit(
                                RoutingFlag::FORWARD,
                                Message::PacketInfo(PacketInfoEvent {
                                    flow: flow.clone(),
                                    node: ctx.node.clone(),
                                    server: true,
                                    tinit_epoch_ms: tinit.epoch_ms(),
                                }),
                            )
                            .await?;
                    }

                    ctx.recorder
                        .emit(
                            RoutingFlag::FORWARD,
                            Message::PacketIo(PacketIoEvent {
                                flow,
                                t: tinit.elapsed(&clock),
                                sent: false,
                                seq: header.seq,
                                length: n as u32,
                            }),
                        )
                        .await?;

                    if header.echo_request {
                        let reply = header.into_reply().encode(n);
                        socket.send_to(&reply, peer).await?;
                    }
                }
                _ = ctx.cancel.cancelled() => return Ok(()),
            }
        }
    }
}

fn next_from_policy<T: Copy>(policy: &PolicyCursor<T>, index: usize) -> T {
    match policy {
        PolicyCursor::Sequential(values) => values[index % values.len()],
        PolicyCursor::UniformRandom(values) => {
            let mut rng = rand::thread_rng();
            values[rng.gen_range(0..values.len())]
        }
    }
}

enum PolicyCursor<T> {
    Sequential(Vec<T>),
    UniformRandom(Vec<T>),
}

impl PolicyCursor<u64> {
    fn from_wait(policy: WaitPolicy) -> (Self, Option<u64>) {
        match policy {
            WaitPolicy::Sequential { values_ms, lead_ms } => (PolicyCursor::Sequential(values_ms), lead_ms),
            WaitPolicy::UniformRandom { values_ms, lead_ms } => (PolicyCursor::UniformRandom(values_ms), lead_ms),
        }
    }
}

impl PolicyCursor<u32> {
    fn from_length(policy: LengthPolicy) -> Self {
        match policy {
            LengthPolicy::Sequential { values } => PolicyCursor::Sequential(values),
            LengthPolicy::UniformRandom { values } => PolicyCursor::UniformRandom(values),
        }
    }
}

/// A shared monotonic sequence-number source, one per client, as required
/// by the wire format's ordering guarantee.
#[derive(Clone, Default)]
struct SequenceSource(Arc<Mutex<u64>>);

impl SequenceSource {
    fn next(&self) -> u64 {
        let mut guard = self.0.lock();
        let seq = *guard;
        *guard += 1;
        seq
    }
}

pub struct PacketClientRunner {
    endpoint: PacketEndpoint,
    schedule: SenderSchedule,
}

impl PacketClientRunner {
    pub fn new(endpoint: PacketEndpoint, schedule: SenderSchedule) -> Result<Self, RunnerError> {
        match &schedule {
            SenderSchedule::Unresponsive { .. } => Ok(PacketClientRunner { endpoint, schedule }),
            SenderSchedule::Unimplemented => Err(RunnerError::UnsupportedSchedule),
        }
    }
}

/// Drains echoed replies off `socket` and records each as a non-sent
/// `PacketIo` event, independent of the sender loop's own cadence.
async fn receive_replies(
    socket: Arc<UdpSocket>,
    recorder: crate::recorder::Recorder,
    flow: FlowId,
    tinit: Tinit,
    clock: impl Clock,
) -> Result<(), RunnerError> {
    let mut buf = [0u8; MAX_DATAGRAM];
    loop {
        let n = socket.recv(&mut buf).await?;
        let header = PacketHeader::decode(&buf[..n])?;
        if !header.echo_reply {
            continue;
        }
        recorder
            .emit(
                RoutingFlag::FORWARD,
                Message::PacketIo(PacketIoEvent {
                    flow: flow.clone(),
                    t: tinit.elapsed(&clock),
                    sent: false,
                    seq: header.seq,
                    length: n as u32,
                }),
            )
            .await?;
    }
}

#[async_trait]
impl Runner for PacketClientRunner {
    async fn run(&mut self, ctx: &mut RunnerCtx) -> Result<(), RunnerError> {
        let SenderSchedule::Unresponsive { wait, length, duration, echo } = self.schedule.clone() else {
            return Err(RunnerError::UnsupportedSchedule);
        };

        let socket = Arc::new(UdpSocket::bind("0.0.0.0:0").await?);
        socket.connect(&self.endpoint.address).await?;
        let clock = SystemClock;
        let tinit = Tinit::sample(&clock);
        let flow = FlowId::from(format!("{}", socket.local_addr()?).as_str());
        let sequence = SequenceSource::default();

        ctx.recorder
            .emit(
                RoutingFlag::FORWARD,
                Message::PacketInfo(PacketInfoEvent {
                    flow: flow.clone(),
                    node: ctx.node.clone(),
                    server: false,
                    tinit_epoch_ms: tinit.epoch_ms(),
                }),
            )
            .await?;

        let receiver = tokio::spawn(receive_replies(socket.clone(), ctx.recorder.clone(), flow.clone(), tinit, clock.clone()));

        let (wait_cursor, lead_ms) = PolicyCursor::from_wait(wait);
        let length_cursor = PolicyCursor::from_length(length);

        if let Some(lead) = lead_ms {
            tokio::time::sleep(std::time::Duration::from_millis(lead)).await;
        }

        let deadline = tokio::time::Instant::now() + std::time::Duration::from(duration);
        let mut index = 0usize;

        while tokio::time::Instant::now() < deadline {
            let wait_ms = next_from_policy(&wait_cursor, index);
            let len = next_from_policy(&length_cursor, index) as usize;
            index += 1;

            tokio::select! {
                _ = tokio::time::sleep(std::time::Duration::from_millis(wait_ms)) => {}
                _ = ctx.cancel.cancelled() => {
                    receiver.abort();
                    return Ok(());
                }
            }

            let seq = sequence.next();
            let header = PacketHeader { echo_request: echo, echo_reply: false, seq, flow: flow.as_str().to_string() };
            let datagram = header.encode(len);
            socket.send(&datagram).await?;

            ctx.recorder
                .emit(
                    RoutingFlag::FORWARD,
                    Message::PacketIo(PacketIoEvent { flow: flow.clone(), t: tinit.elapsed(&clock), sent: true, seq, length: datagram.len() as u32 }),
                )
                .await?;
        }

        receiver.abort();
        Ok(())
    }
}
