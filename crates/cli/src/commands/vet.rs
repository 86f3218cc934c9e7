// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use anyhow::Result;
use antler_config::Config;

/// `antler-config::load` already ran structural validation before this
/// handler is reached; reaching it at all means the config is sound.
pub fn handle(config: &Config) -> Result<()> {
    let test_count = config.root.tests().len();
    println!("config OK: {} node(s), {} Test(s)", config.nodes.len(), test_count);
    Ok(())
}
