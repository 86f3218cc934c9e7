// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structural validation run once, before any Test executes: duplicate
//! Test ids, ambiguous Node ids, and result paths two Tests would both
//! write to are all fatal configuration errors.

use crate::config::Config;
use crate::error::ConfigError;
use std::collections::HashSet;

pub fn validate(config: &Config) -> Result<(), ConfigError> {
    let mut seen_nodes = HashSet::new();
    for node in &config.nodes {
        if !seen_nodes.insert(node.id.clone()) {
            return Err(ConfigError::AmbiguousNodeId(node.id.clone()));
        }
    }

    let mut seen_test_ids = HashSet::new();
    let mut seen_result_paths = HashSet::new();
    for test in config.root.tests() {
        if !seen_test_ids.insert(test.id.canonical()) {
            return Err(ConfigError::DuplicateTestId(test.id.clone()));
        }
        if !seen_result_paths.insert(test.output_path.clone()) {
            return Err(ConfigError::DuplicateResultPath(test.output_path.clone()));
        }
        for node in test.run.child_nodes() {
            if !seen_nodes.contains(node) {
                return Err(ConfigError::UnknownNode(node.clone()));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
