// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire format tests: length-prefix framing, JSON encoding, and the
//! transport round trip.

use super::*;
use crate::transport::{decode, encode, read_frame, write_frame};
use antler_core::{Duration, FlowId, NodeId};

#[test]
fn encode_returns_json_without_length_prefix() {
    let message = Message::StartRun { run_json: String::new() };
    let encoded = encode(RoutingFlag::PROCESS, &message).expect("encode failed");

    let json_str = std::str::from_utf8(&encoded).expect("should be valid UTF-8");
    assert!(json_str.starts_with('{'), "should be JSON object: {}", json_str);
}

#[tokio::test]
async fn read_write_frame_roundtrip() {
    let original = b"hello world";

    let mut buffer = Vec::new();
    write_frame(&mut buffer, original).await.expect("write failed");

    assert_eq!(buffer.len(), 4 + original.len());

    let mut cursor = std::io::Cursor::new(buffer);
    let read_back = read_frame(&mut cursor).await.expect("read failed");

    assert_eq!(read_back, original);
}

#[tokio::test]
async fn write_frame_adds_length_prefix() {
    let data = b"test data";

    let mut buffer = Vec::new();
    write_frame(&mut buffer, data).await.expect("write failed");

    let len = u32::from_be_bytes([buffer[0], buffer[1], buffer[2], buffer[3]]) as usize;

    assert_eq!(len, data.len());
    assert_eq!(&buffer[4..], data);
}

#[tokio::test]
async fn read_frame_on_clean_eof_reports_closed() {
    let mut cursor = std::io::Cursor::new(Vec::<u8>::new());
    let err = read_frame(&mut cursor).await.unwrap_err();
    assert!(matches!(err, WireError::Closed));
}

#[tokio::test]
async fn transport_round_trips_every_message_variant() {
    let (client, server) = tokio::io::duplex(4096);
    let mut client = Transport::new(client);
    let mut server = Transport::new(server);

    let messages = vec![
        Message::StartRun { run_json: String::new() },
        Message::Cancel { cause: "operator requested stop".into() },
        Message::Bye { error: None },
        Message::ExecChunk { bytes: vec![1, 2, 3], offset: 0, total: 3 },
        Message::StreamInfo(StreamInfoEvent {
            flow: FlowId::from("flow-a"),
            node: NodeId::from("node-a"),
            server: true,
            tinit_epoch_ms: 1000,
        }),
        Message::LogEntry(LogEntryEvent {
            node: NodeId::from("node-a"),
            t: Duration::from_nanos(500),
            message: "started".into(),
        }),
    ];

    for message in messages {
        client.send(RoutingFlag::FORWARD, &message).await.expect("send failed");
        let (flag, received) = server.recv().await.expect("recv failed");
        assert_eq!(flag, RoutingFlag::FORWARD);
        assert_eq!(received, message);
    }
}

#[tokio::test]
async fn transport_recv_after_peer_drop_reports_closed() {
    let (client, server) = tokio::io::duplex(4096);
    drop(client);
    let mut server = Transport::new(server);

    let err = server.recv().await.unwrap_err();
    assert!(matches!(err, WireError::Closed));
}

#[test]
fn decode_rejects_truncated_payload() {
    let err = decode(b"{\"flag\":{\"forward\":true").unwrap_err();
    assert!(matches!(err, WireError::Decode(_)));
}

#[test]
fn message_flow_extracts_the_carrying_flow() {
    let event = Message::PacketIo(PacketIoEvent {
        flow: FlowId::from("flow-b"),
        t: Duration::from_nanos(1),
        sent: true,
        seq: 0,
        length: 64,
    });
    assert_eq!(event.flow(), Some(&FlowId::from("flow-b")));
    assert_eq!(Message::StartRun { run_json: String::new() }.flow(), None);
}

#[tokio::test]
async fn split_reader_and_writer_halves_round_trip_independently() {
    let (client, server) = tokio::io::duplex(4096);
    let (mut client_reader, mut client_writer) = Transport::new(client).split();
    let (mut server_reader, mut server_writer) = Transport::new(server).split();

    let message = Message::Cancel { cause: "operator requested stop".into() };
    client_writer.send(RoutingFlag::PROCESS, &message).await.expect("send failed");
    let (flag, received) = server_reader.recv().await.expect("recv failed");
    assert_eq!(flag, RoutingFlag::PROCESS);
    assert_eq!(received, message);

    let reply = Message::Bye { error: None };
    server_writer.send(RoutingFlag::FORWARD, &reply).await.expect("send failed");
    let (flag, received) = client_reader.recv().await.expect("recv failed");
    assert_eq!(flag, RoutingFlag::FORWARD);
    assert_eq!(received, reply);
}

#[test]
fn only_events_report_true_from_is_event() {
    assert!(!Message::StartRun { run_json: String::new() }.is_event());
    assert!(!Message::Cancel { cause: "x".into() }.is_event());
    assert!(Message::FileRef(FileRefEvent { node: NodeId::from("n"), name: "out.log".into() }).is_event());
}
