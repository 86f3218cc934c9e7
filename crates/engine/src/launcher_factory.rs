// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Turns a configured `LauncherConfig` into a live `antler_launch::Launcher`.
//! `Local` wraps `antler_node::run_worker` itself so an in-process child
//! node runs the exact same worker loop a namespaced or remote peer would.

use antler_config::{LauncherConfig, NamespaceConfig};
use antler_launch::{BinaryRegistry, Launcher, LocalLauncher, NamespaceLauncher, NetNamespace, RemoteLauncher};
use antler_node::run_worker;
use antler_core::NodeId;
use std::sync::Arc;

fn map_namespace(config: &NamespaceConfig) -> NetNamespace {
    match config {
        NamespaceConfig::Fresh => NetNamespace::Fresh,
        NamespaceConfig::Named { name } => NetNamespace::Named(name.clone()),
    }
}

/// Builds the launcher a root or intermediate node uses to bring up
/// `node_id`. `registry` is shared so namespace/remote launches can look up
/// the embedded worker binary for the node's platform.
pub fn build_launcher(config: &LauncherConfig, node_id: NodeId, registry: Arc<BinaryRegistry>) -> Arc<dyn Launcher> {
    match config {
        LauncherConfig::Local => Arc::new(LocalLauncher::new(move |duplex| {
            let registry = registry.clone();
            let node_id = node_id.clone();
            async move {
                run_worker(antler_wire::Transport::new(duplex), registry, node_id).await;
            }
        })),
        LauncherConfig::Namespace(namespace) => Arc::new(NamespaceLauncher::new(map_namespace(namespace))),
        LauncherConfig::Remote { argv } => Arc::new(RemoteLauncher::new(argv.clone())),
    }
}
