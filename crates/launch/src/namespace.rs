// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Forks a child into a fresh (or named) network namespace and execs the
//! embedded worker binary there, wiring its stdio to pipes the parent keeps.

use crate::duplex::BoxedDuplex;
use crate::error::LaunchError;
use crate::launcher::Launcher;
use crate::registry::BinaryRegistry;
use antler_core::PlatformTag;
use antler_wire::Transport;
use async_trait::async_trait;
use nix::sched::{setns, unshare, CloneFlags};
use nix::unistd::{fork, ForkResult};
use std::fs::Permissions;
use std::os::fd::{AsRawFd, RawFd};
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use tokio::net::UnixStream;

/// Where to place the worker before it executes.
fn worker_path(platform: &PlatformTag) -> PathBuf {
    std::env::temp_dir().join(format!("antler-worker-{}", platform.as_str()))
}

/// Either join an existing network namespace by name, or create a fresh one
/// with `CLONE_NEWNET`.
#[derive(Debug, Clone)]
pub enum NetNamespace {
    Fresh,
    Named(String),
}

pub struct NamespaceLauncher {
    namespace: NetNamespace,
}

impl NamespaceLauncher {
    pub fn new(namespace: NetNamespace) -> Self {
        NamespaceLauncher { namespace }
    }

    fn enter_namespace(&self) -> Result<(), LaunchError> {
        match &self.namespace {
            NetNamespace::Fresh => {
                unshare(CloneFlags::CLONE_NEWNET).map_err(|e| LaunchError::Namespace(e.to_string()))
            }
            NetNamespace::Named(name) => {
                let path = format!("/var/run/netns/{name}");
                let file = std::fs::File::open(&path).map_err(LaunchError::Spawn)?;
                setns(file, CloneFlags::CLONE_NEWNET)
                    .map_err(|e| LaunchError::Namespace(e.to_string()))
            }
        }
    }
}

#[async_trait]
impl Launcher for NamespaceLauncher {
    async fn launch(
        &self,
        platform: &PlatformTag,
        registry: &BinaryRegistry,
    ) -> Result<Transport<BoxedDuplex>, LaunchError> {
        let bytes = registry.bytes(platform)?;
        let path = worker_path(platform);
        std::fs::write(&path, bytes).map_err(LaunchError::Spawn)?;
        std::fs::set_permissions(&path, Permissions::from_mode(0o755)).map_err(LaunchError::Spawn)?;

        let (parent_sock, child_sock) = UnixStream::pair().map_err(LaunchError::Spawn)?;
        let child_fd: RawFd = child_sock.as_raw_fd();

        // SAFETY: the child performs only async-signal-safe operations
        // (namespace entry, dup2, exec) before calling exec, and never
        // returns into Rust's async runtime.
        match unsafe { fork() }.map_err(|e| LaunchError::Namespace(e.to_string()))? {
            ForkResult::Parent { .. } => {
                drop(child_sock);
                Ok(Transport::new(Box::new(parent_sock)))
            }
            ForkResult::Child => {
                drop(parent_sock);
                if self.enter_namespace().is_err() {
                    std::process::exit(1);
                }
                nix::unistd::dup2(child_fd, 0).ok();
                nix::unistd::dup2(child_fd, 1).ok();
                let err = std::process::Command::new(&path).exec_replacing();
                let _ = err;
                std::process::exit(127);
            }
        }
    }
}

trait ExecReplacing {
    fn exec_replacing(&mut self) -> std::io::Error;
}

impl ExecReplacing for std::process::Command {
    fn exec_replacing(&mut self) -> std::io::Error {
        use std::os::unix::process::CommandExt;
        self.exec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_path_is_scoped_by_platform() {
        let a = worker_path(&PlatformTag::from("linux-amd64"));
        let b = worker_path(&PlatformTag::from("linux-arm64"));
        assert_ne!(a, b);
    }
}
