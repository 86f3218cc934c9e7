// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Store(#[from] antler_store::StoreError),

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("event record encoding failed: {0}")]
    Encode(#[from] bincode::Error),

    #[error("upstream channel closed before this stage finished")]
    UpstreamClosed,
}
