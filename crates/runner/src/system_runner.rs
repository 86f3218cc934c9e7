// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Executes an opaque external command. A background command installs a
//! canceler that signals and waits for the child; a foreground command just
//! returns once the child exits.

use crate::ctx::RunnerCtx;
use crate::error::RunnerError;
use crate::runner::Runner;
use antler_tree::SystemCommand;
use antler_wire::{FileDataEvent, Message, RoutingFlag};
use async_trait::async_trait;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::sync::oneshot;

pub struct SystemRunner {
    command: SystemCommand,
}

impl SystemRunner {
    pub fn new(command: SystemCommand) -> Self {
        SystemRunner { command }
    }

    async fn capture_to_file(
        recorder: &crate::recorder::Recorder,
        node: antler_core::NodeId,
        name: String,
        mut reader: impl tokio::io::AsyncRead + Unpin,
    ) -> Result<(), RunnerError> {
        let mut buf = [0u8; 8192];
        loop {
            let n = reader.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            recorder
                .emit(
                    RoutingFlag::FORWARD,
                    Message::FileData(FileDataEvent { node: node.clone(), name: name.clone(), data: buf[..n].to_vec() }),
                )
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Runner for SystemRunner {
    async fn run(&mut self, ctx: &mut RunnerCtx) -> Result<(), RunnerError> {
        let (program, args) = self.command.argv.split_first().ok_or_else(|| RunnerError::Command("empty argv".into()))?;
        let mut cmd = Command::new(program);
        cmd.args(args).envs(&self.command.env).kill_on_drop(true);
        if self.command.stdout_file.is_some() {
            cmd.stdout(std::process::Stdio::piped());
        }
        if self.command.stderr_file.is_some() {
            cmd.stderr(std::process::Stdio::piped());
        }

        let mut child = cmd.spawn()?;
        let node = ctx.node.clone();
        let mut captures = Vec::new();

        if let (Some(name), Some(stdout)) = (self.command.stdout_file.clone(), child.stdout.take()) {
            let recorder = ctx.recorder.clone();
            let node = node.clone();
            captures.push(tokio::spawn(async move { Self::capture_to_file(&recorder, node, name, stdout).await }));
        }
        if let (Some(name), Some(stderr)) = (self.command.stderr_file.clone(), child.stderr.take()) {
            let recorder = ctx.recorder.clone();
            let node = node.clone();
            captures.push(tokio::spawn(async move { Self::capture_to_file(&recorder, node, name, stderr).await }));
        }

        let wait_result = if self.command.background {
            let pid = child.id().map(|raw| Pid::from_raw(raw as i32));
            let (done_tx, done_rx) = oneshot::channel();
            ctx.register_canceler(move || {
                if let Some(pid) = pid {
                    let _ = kill(pid, Signal::SIGTERM);
                }
                let _ = done_tx.send(());
            });

            tokio::select! {
                result = child.wait() => result.map(|_| ()).map_err(RunnerError::from),
                _ = done_rx => child.wait().await.map(|_| ()).map_err(RunnerError::from),
            }
        } else {
            tokio::select! {
                result = child.wait() => result.map(|_| ()).map_err(RunnerError::from),
                _ = ctx.cancel.cancelled() => {
                    let _ = child.kill().await;
                    Ok(())
                }
            }
        };

        // The child's stdout/stderr pipes close once the process exits, so
        // its capture tasks finish shortly after `wait` resolves; join them
        // before returning so every FileData chunk reaches the recorder
        // while this runner is still considered active.
        for capture in captures {
            let _ = capture.await;
        }

        wait_result
    }
}
