// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use antler_core::NodeId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Node(#[from] antler_node::NodeError),

    #[error(transparent)]
    Store(#[from] antler_store::StoreError),

    #[error(transparent)]
    Report(#[from] antler_report::ReportError),

    #[error("failed to serialize a run tree: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("no launcher configured for root node {0}")]
    NoRootLauncher(NodeId),

    #[error("a Test timed out before it completed")]
    DeadlineExceeded,

    #[error("a pipeline or execution task panicked: {0}")]
    TaskPanicked(String),
}
