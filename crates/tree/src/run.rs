// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::runner_spec::RunnerSpec;
use antler_core::NodeId;
use serde::{Deserialize, Serialize};

/// The Run tree: serial/parallel scheduling of leaf workloads, and the
/// points at which execution hands off to a child node.
///
/// Externally tagged rather than internally tagged like `RunnerSpec`: a
/// `Leaf` variant's content is itself a tagged `RunnerSpec`, and `Serial`/
/// `Parallel` wrap a bare sequence, neither of which can share a `kind`
/// field with an outer tag at the same map level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Run {
    Leaf(RunnerSpec),
    Serial(Vec<Run>),
    Parallel(Vec<Run>),
    Child { node: NodeId, run: Box<Run> },
}

impl Run {
    /// Every `NodeId` reachable through `Child` links, in tree order.
    pub fn child_nodes(&self) -> Vec<&NodeId> {
        let mut nodes = Vec::new();
        self.collect_child_nodes(&mut nodes);
        nodes
    }

    fn collect_child_nodes<'a>(&'a self, out: &mut Vec<&'a NodeId>) {
        match self {
            Run::Leaf(_) => {}
            Run::Serial(children) | Run::Parallel(children) => {
                for child in children {
                    child.collect_child_nodes(out);
                }
            }
            Run::Child { node, run } => {
                out.push(node);
                run.collect_child_nodes(out);
            }
        }
    }
}
