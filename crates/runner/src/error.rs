// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("a send schedule variant is not implemented by this build")]
    UnsupportedSchedule,

    #[error("packet with unrecognized magic prefix {0:02x?}")]
    BadMagic(Vec<u8>),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("external command failed: {0}")]
    Command(String),

    #[error("recorder channel closed")]
    RecorderClosed,
}
