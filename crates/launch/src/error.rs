// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("no worker binary registered for platform {0:?}")]
    UnknownPlatform(antler_core::PlatformTag),

    #[error("failed to spawn worker process: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("namespace setup failed: {0}")]
    Namespace(String),

    #[error("remote bootstrap failed: {0}")]
    Bootstrap(String),
}
