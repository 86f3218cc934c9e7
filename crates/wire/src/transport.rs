// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Length-prefixed framing: 4-byte length prefix (big-endian) + JSON payload,
//! carried over any `AsyncRead + AsyncWrite` duplex.

use crate::{Message, RoutingFlag, WireError};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

const MAX_FRAME_LEN: u32 = 64 * 1024 * 1024;

/// What actually crosses the wire: a message plus the routing flag its
/// emitter attached to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Envelope {
    flag: RoutingFlag,
    message: Message,
}

/// Serializes a routed message to JSON without the length prefix.
pub fn encode(flag: RoutingFlag, message: &Message) -> Result<Vec<u8>, WireError> {
    serde_json::to_vec(&Envelope { flag, message: message.clone() }).map_err(|e| WireError::Encode(e.to_string()))
}

/// Deserializes a routed message from a raw JSON payload.
pub fn decode(bytes: &[u8]) -> Result<(RoutingFlag, Message), WireError> {
    let envelope: Envelope = serde_json::from_slice(bytes).map_err(|e| WireError::Decode(e.to_string()))?;
    Ok((envelope.flag, envelope.message))
}

/// Writes `payload` as one frame: a 4-byte big-endian length prefix followed
/// by the bytes themselves.
pub async fn write_frame<W: AsyncWrite + Unpin>(writer: &mut W, payload: &[u8]) -> Result<(), WireError> {
    let len = u32::try_from(payload.len()).map_err(|_| WireError::Encode("frame too large".into()))?;
    writer.write_all(&len.to_be_bytes()).await?;
    writer.write_all(payload).await?;
    writer.flush().await?;
    Ok(())
}

/// Reads one length-prefixed frame. Returns `WireError::Closed` on a clean
/// EOF at a frame boundary.
pub async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Vec<u8>, WireError> {
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Err(WireError::Closed),
        Err(e) => return Err(WireError::Io(e)),
    }
    let len = u32::from_be_bytes(len_buf);
    if len > MAX_FRAME_LEN {
        return Err(WireError::Decode(format!("frame length {len} exceeds maximum")));
    }
    let mut payload = vec![0u8; len as usize];
    reader.read_exact(&mut payload).await?;
    Ok(payload)
}

/// A typed, bidirectional message link between a node and its parent, or
/// between the engine and the root node.
pub struct Transport<S> {
    stream: S,
}

impl<S: AsyncRead + AsyncWrite + Unpin> Transport<S> {
    pub fn new(stream: S) -> Self {
        Transport { stream }
    }

    pub async fn send(&mut self, flag: RoutingFlag, message: &Message) -> Result<(), WireError> {
        let payload = encode(flag, message)?;
        write_frame(&mut self.stream, &payload).await
    }

    pub async fn recv(&mut self) -> Result<(RoutingFlag, Message), WireError> {
        let payload = read_frame(&mut self.stream).await?;
        decode(&payload)
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl<S: AsyncRead + AsyncWrite + Send + Unpin + 'static> Transport<S> {
    /// Splits into independent read/write halves so a caller can drive
    /// inbound and outbound traffic from separate tasks without trading
    /// `&mut self` back and forth.
    pub fn split(self) -> (TransportReader<tokio::io::ReadHalf<S>>, TransportWriter<tokio::io::WriteHalf<S>>) {
        let (read_half, write_half) = tokio::io::split(self.stream);
        (TransportReader { stream: read_half }, TransportWriter { stream: write_half })
    }
}

pub struct TransportReader<R> {
    stream: R,
}

impl<R: AsyncRead + Unpin> TransportReader<R> {
    pub async fn recv(&mut self) -> Result<(RoutingFlag, Message), WireError> {
        let payload = read_frame(&mut self.stream).await?;
        decode(&payload)
    }
}

pub struct TransportWriter<W> {
    stream: W,
}

impl<W: AsyncWrite + Unpin> TransportWriter<W> {
    pub async fn send(&mut self, flag: RoutingFlag, message: &Message) -> Result<(), WireError> {
        let payload = encode(flag, message)?;
        write_frame(&mut self.stream, &payload).await
    }
}
