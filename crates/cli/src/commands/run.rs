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
use tracing::{error, info};

/// Executes every Test matching the given filters, writing results under
/// `results_dir`. A first Ctrl-C asks the engine to cancel whichever Test
/// is currently in flight; a second forces immediate termination.
pub async fn handle(config: &Config, results_dir: &Path, registry: Arc<BinaryRegistry>, force: bool, filters: &[String]) -> Result<()> {
    let filters = Filters::parse(filters)?;
    let codecs = CodecRegistry::new();
    let engine = Engine::new(registry, codecs, results_dir, force);

    let cancel = engine.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\ninterrupt received, canceling the current Test (press again to force exit)");
            cancel.cancel();
        }
        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });

    let mut failures = 0;
    for (test, group_after) in config.root.tests_with_group_after() {
        if !filters.matches(&test.id) {
            continue;
        }
        info!(test = %test.id, "running Test");
        match engine.run_test(&config.nodes, test, group_after).await {
            Ok(TestOutcome::Ran { result_dir }) => println!("{}: ran, {}", test.id, result_dir.display()),
            Ok(TestOutcome::RanEmpty) => println!("{}: ran, produced nothing to keep", test.id),
            Ok(TestOutcome::TimedOut) => println!("{}: timed out", test.id),
            Ok(TestOutcome::Interrupted) => {
                println!("{}: interrupted", test.id);
                break;
            }
            Ok(TestOutcome::Skipped { result_dir }) => println!("{}: skipped, {}", test.id, result_dir.display()),
            Ok(TestOutcome::NoDataToReport) => println!("{}: no data to report", test.id),
            Err(err) => {
                error!(test = %test.id, error = %err, "Test failed");
                println!("{}: error: {err}", test.id);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(ExitError::new(1, format!("{failures} Test(s) failed")).into());
    }
    Ok(())
}
