// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Transport errors are fatal for every runner below the affected link.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("frame decode failed: {0}")]
    Decode(String),

    #[error("frame encode failed: {0}")]
    Encode(String),

    #[error("link closed")]
    Closed,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
