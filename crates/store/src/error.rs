// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error at {path}: {source}")]
    Io { path: std::path::PathBuf, source: std::io::Error },

    #[error("no codec registered for extension {0:?}")]
    UnknownCodec(String),

    #[error("codec command failed with status {0}")]
    CodecFailed(std::process::ExitStatus),

    #[error("a writer for {0:?} is already open in this workspace")]
    AlreadyOpen(String),
}

impl StoreError {
    pub fn io(path: impl Into<std::path::PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io { path: path.into(), source }
    }
}
