// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! How to bring up each node the Run tree can hand off to: in-process, in
//! an isolated network namespace, or on a remote host.

use antler_core::{NodeId, PlatformTag};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NamespaceConfig {
    Fresh,
    Named { name: String },
}

/// Externally tagged rather than internally tagged: `Namespace` wraps
/// `NamespaceConfig`, itself internally tagged, and the two can't share a
/// `kind` field at the same map level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LauncherConfig {
    Local,
    Namespace(NamespaceConfig),
    Remote { argv: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    pub id: NodeId,
    pub platform: PlatformTag,
    pub launcher: LauncherConfig,
}
