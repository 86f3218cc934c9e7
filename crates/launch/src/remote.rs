// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Spawns an interactive login shell on a remote host and bootstraps the
//! worker binary through its own stdin, so the child's stdio becomes the
//! transport duplex once the worker execs.

use crate::duplex::BoxedDuplex;
use crate::error::LaunchError;
use crate::launcher::Launcher;
use crate::registry::BinaryRegistry;
use antler_core::PlatformTag;
use antler_wire::Transport;
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::{ChildStdin, ChildStdout, Command};
use tracing::info;

/// A remote peer reachable through an argv that leaves an interactive shell
/// attached to stdin/stdout (`ssh -tt host`, a serial console wrapper, etc).
pub struct RemoteLauncher {
    argv: Vec<String>,
}

impl RemoteLauncher {
    pub fn new(argv: Vec<String>) -> Self {
        RemoteLauncher { argv }
    }

    fn bootstrap_script(remote_path: &str, size: u64) -> String {
        format!(
            "head -c {size} > {remote_path} && chmod +x {remote_path} && exec {remote_path}\n",
            size = size,
            remote_path = remote_path
        )
    }
}

pub struct RemoteDuplex {
    stdin: ChildStdin,
    stdout: ChildStdout,
}

impl tokio::io::AsyncRead for RemoteDuplex {
    fn poll_read(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
        buf: &mut tokio::io::ReadBuf<'_>,
    ) -> std::task::Poll<std::io::Result<()>> {
        std::pin::Pin::new(&mut self.stdout).poll_read(cx, buf)
    }
}

impl tokio::io::AsyncWrite for RemoteDuplex {
    fn poll_write(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
        buf: &[u8],
    ) -> std::task::Poll<std::io::Result<usize>> {
        std::pin::Pin::new(&mut self.stdin).poll_write(cx, buf)
    }

    fn poll_flush(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::io::Result<()>> {
        std::pin::Pin::new(&mut self.stdin).poll_flush(cx)
    }

    fn poll_shutdown(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::io::Result<()>> {
        std::pin::Pin::new(&mut self.stdin).poll_shutdown(cx)
    }
}

#[async_trait]
impl Launcher for RemoteLauncher {
    async fn launch(
        &self,
        platform: &PlatformTag,
        registry: &BinaryRegistry,
    ) -> Result<Transport<BoxedDuplex>, LaunchError> {
        let bytes = registry.bytes(platform)?;
        let size = bytes.len() as u64;
        let remote_path = format!("/tmp/antler-worker-{}", platform.as_str());

        let (program, args) = self.argv.split_first().ok_or_else(|| LaunchError::Bootstrap("empty remote argv".into()))?;
        let mut child = Command::new(program)
            .args(args)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .spawn()?;

        let mut stdin = child.stdin.take().ok_or_else(|| LaunchError::Bootstrap("no stdin on remote shell".into()))?;
        let stdout = child.stdout.take().ok_or_else(|| LaunchError::Bootstrap("no stdout on remote shell".into()))?;

        info!(platform = %platform, remote_path, size, "bootstrapping remote worker");
        let script = Self::bootstrap_script(&remote_path, size);
        stdin.write_all(script.as_bytes()).await?;
        stdin.write_all(bytes).await?;
        stdin.flush().await?;

        let duplex = RemoteDuplex { stdin, stdout };
        Ok(Transport::new(Box::new(duplex)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_script_embeds_size_and_path() {
        let script = RemoteLauncher::bootstrap_script("/tmp/antler-worker-linux-amd64", 4096);
        assert!(script.contains("head -c 4096"));
        assert!(script.contains("/tmp/antler-worker-linux-amd64"));
        assert!(script.contains("chmod +x"));
    }
}
