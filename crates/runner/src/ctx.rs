// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::recorder::Recorder;
use antler_core::NodeId;
use tokio_util::sync::CancellationToken;

/// Everything a runner needs from its enclosing node: the node's own
/// identity, somewhere to emit events, a way to notice cancellation, and a
/// slot to register at most one canceler the node will invoke before
/// awaiting this runner's join handle.
pub struct RunnerCtx {
    pub node: NodeId,
    pub recorder: Recorder,
    pub cancel: CancellationToken,
    canceler_slot: Option<Box<dyn FnOnce() + Send>>,
}

impl RunnerCtx {
    pub fn new(node: NodeId, recorder: Recorder, cancel: CancellationToken) -> Self {
        RunnerCtx { node, recorder, cancel, canceler_slot: None }
    }

    /// Registers a canceler. A runner calls this at most once, typically
    /// right after spawning a background resource (a child process, a
    /// listening socket) that needs an explicit nudge to unblock on cancel.
    pub fn register_canceler(&mut self, canceler: impl FnOnce() + Send + 'static) {
        self.canceler_slot = Some(Box::new(canceler));
    }

    pub fn take_canceler(&mut self) -> Option<Box<dyn FnOnce() + Send>> {
        self.canceler_slot.take()
    }
}
