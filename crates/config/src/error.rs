// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use antler_core::{NodeId, TestId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io { path: std::path::PathBuf, source: std::io::Error },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("duplicate test id: {0}")]
    DuplicateTestId(TestId),

    #[error("ambiguous node id, declared more than once: {0}")]
    AmbiguousNodeId(NodeId),

    #[error("more than one test resolves to result path {0:?}")]
    DuplicateResultPath(String),

    #[error("run tree references undeclared node: {0}")]
    UnknownNode(NodeId),
}

impl ConfigError {
    pub fn io(path: impl Into<std::path::PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Io { path: path.into(), source }
    }
}
