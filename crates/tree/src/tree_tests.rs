// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use antler_core::Duration;

fn sleep(ms: u64) -> Run {
    Run::Leaf(RunnerSpec::Sleep { duration: Duration::from_nanos(ms * 1_000_000) })
}

#[test]
fn child_nodes_collects_in_tree_order() {
    let tree = Run::Serial(vec![
        sleep(1),
        Run::Child { node: NodeId::from("server"), run: Box::new(sleep(2)) },
        Run::Parallel(vec![
            sleep(3),
            Run::Child { node: NodeId::from("client"), run: Box::new(sleep(4)) },
        ]),
    ]);

    let nodes: Vec<&str> = tree.child_nodes().into_iter().map(|n| n.as_str()).collect();
    assert_eq!(nodes, vec!["server", "client"]);
}

#[derive(Default)]
struct RecordingVisitor {
    events: Vec<String>,
}

impl Visitor for RecordingVisitor {
    fn leaf(&mut self, spec: &RunnerSpec) {
        self.events.push(format!("leaf:{spec:?}"));
    }

    fn enter_group(&mut self, parallel: bool) {
        self.events.push(if parallel { "enter:parallel".into() } else { "enter:serial".into() });
    }

    fn exit_group(&mut self) {
        self.events.push("exit".into());
    }

    fn child(&mut self, node: &NodeId, run: &Run) {
        self.events.push(format!("child:{node}"));
        walk(run, self);
    }
}

#[test]
fn walk_visits_groups_and_recurses_into_children() {
    let tree = Run::Serial(vec![sleep(1), Run::Child { node: NodeId::from("n1"), run: Box::new(sleep(2)) }]);

    let mut visitor = RecordingVisitor::default();
    walk(&tree, &mut visitor);

    assert_eq!(visitor.events[0], "enter:serial");
    assert!(visitor.events[1].starts_with("leaf:"));
    assert_eq!(visitor.events[2], "child:n1");
    assert!(visitor.events[3].starts_with("leaf:"));
    assert_eq!(visitor.events[4], "exit");
}

#[test]
fn run_tree_round_trips_through_json() {
    let tree = Run::Parallel(vec![
        Run::Leaf(RunnerSpec::StreamServer {
            endpoint: StreamEndpoint { address: "0.0.0.0:9000".into(), congestion_control: None },
        }),
        Run::Leaf(RunnerSpec::PacketClient {
            endpoint: PacketEndpoint { address: "127.0.0.1:9001".into() },
            schedule: SenderSchedule::Unresponsive {
                wait: WaitPolicy::Sequential { values_ms: vec![10, 20], lead_ms: None },
                length: LengthPolicy::UniformRandom { values: vec![64, 128] },
                duration: Duration::from_nanos(1_000_000_000),
                echo: false,
            },
        }),
    ]);

    let json = serde_json::to_string(&tree).expect("serialize");
    let round_tripped: Run = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(tree, round_tripped);
}

#[test]
fn unknown_schedule_kind_deserializes_to_unimplemented() {
    let json = r#"{"kind":"Bursty","values":[1,2,3]}"#;
    let schedule: SenderSchedule = serde_json::from_str(json).expect("deserialize");
    assert_eq!(schedule, SenderSchedule::Unimplemented);
}
