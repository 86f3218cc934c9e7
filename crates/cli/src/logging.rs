// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing setup: an `EnvFilter` honoring `ANTLER_LOG` always goes to
//! stderr. `run`, the one long-running subcommand, also tees events into a
//! rolling log file under the results directory so a run's history survives
//! after the terminal scrolls away.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn init(is_run: bool, results_dir: &Path) -> Option<WorkerGuard> {
    let filter = || EnvFilter::try_from_env("ANTLER_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    if !is_run {
        tracing_subscriber::registry().with(filter()).with(fmt::layer().with_writer(std::io::stderr)).init();
        return None;
    }

    let _ = std::fs::create_dir_all(results_dir);
    let file_appender = tracing_appender::rolling::daily(results_dir, "antler.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter())
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Some(guard)
}
