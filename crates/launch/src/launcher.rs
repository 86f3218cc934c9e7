// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::duplex::BoxedDuplex;
use crate::error::LaunchError;
use crate::registry::BinaryRegistry;
use antler_core::PlatformTag;
use antler_wire::Transport;
use async_trait::async_trait;

/// Brings a worker up somewhere and hands back a transport to it. Local,
/// namespace-isolated, and remote launches differ only in what kind of
/// duplex they produce underneath.
#[async_trait]
pub trait Launcher: Send + Sync {
    async fn launch(
        &self,
        platform: &PlatformTag,
        registry: &BinaryRegistry,
    ) -> Result<Transport<BoxedDuplex>, LaunchError>;
}
