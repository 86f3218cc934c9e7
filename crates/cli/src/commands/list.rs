// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::filter::Filters;
use anyhow::Result;
use antler_config::Config;

/// Prints every Test whose id matches every given filter, one per line.
pub fn handle(config: &Config, filters: &[String]) -> Result<()> {
    let filters = Filters::parse(filters)?;
    let mut count = 0;
    for test in config.root.tests() {
        if filters.matches(&test.id) {
            println!("{}", test.id);
            count += 1;
        }
    }
    if count == 0 {
        eprintln!("no Tests matched the given filters");
    }
    Ok(())
}
