// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared error glue. Each downstream crate defines its own `thiserror`
//! enum at its boundary; `CoreError` only covers failures that can occur
//! while building the primitives in this crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}
