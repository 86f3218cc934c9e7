// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error(transparent)]
    Runner(#[from] antler_runner::RunnerError),

    #[error(transparent)]
    Launch(#[from] antler_launch::LaunchError),

    #[error(transparent)]
    Wire(#[from] antler_wire::WireError),

    #[error("failed to decode a run tree: {0}")]
    InvalidRun(#[from] serde_json::Error),

    #[error("no launcher registered for child node {0}")]
    NoLauncher(antler_core::NodeId),
}
