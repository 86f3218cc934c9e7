// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::exit_error::ExitError;
use crate::filter::Filters;
use anyhow::Result;
use antler_config::Config;
use antler_engine::{Engine, TestOutcome};
use antler_launch::BinaryRegistry;
use antler_store::CodecRegistry;
use std::path::Path;
use std::sync::Arc;
use tracing::error;

/// Re-runs the "after" report pipelines for every Test matching the given
/// filters against its previously saved data, without executing anything.
pub async fn handle(config: &Config, results_dir: &Path, registry: Arc<BinaryRegistry>, filters: &[String]) -> Result<()> {
    let filters = Filters::parse(filters)?;
    let codecs = CodecRegistry::new();
    let engine = Engine::new(registry, codecs, results_dir, false);

    let mut failures = 0;
    for (test, group_after) in config.root.tests_with_group_after() {
        if !filters.matches(&test.id) {
            continue;
        }
        match engine.report_test(test, group_after).await {
            Ok(TestOutcome::Skipped { result_dir }) => println!("{}: reported, {}", test.id, result_dir.display()),
            Ok(TestOutcome::NoDataToReport) => println!("{}: no data to report", test.id),
            Ok(other) => println!("{}: {other:?}", test.id),
            Err(err) => {
                error!(test = %test.id, error = %err, "failed to report Test");
                println!("{}: error: {err}", test.id);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(ExitError::new(1, format!("{failures} Test(s) failed to report")).into());
    }
    Ok(())
}
