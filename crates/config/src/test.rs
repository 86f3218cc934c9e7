// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::report_stage::ReportStageConfig;
use antler_core::{Duration, TestId};
use antler_tree::Run;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestConfig {
    pub id: TestId,
    /// A template for the test's result directory, e.g.
    /// `"results/{proto}/{cc}"`; `antler-engine` expands `{key}` against
    /// the test's own id pairs.
    pub output_path: String,
    /// The persisted event-stream file name within the result directory.
    /// `None` means events are only buffered in memory for the "after"
    /// pipeline, never durably saved.
    #[serde(default)]
    pub data_file: Option<String>,
    pub run: Run,
    #[serde(default)]
    pub during: Vec<ReportStageConfig>,
    #[serde(default)]
    pub after: Vec<ReportStageConfig>,
    #[serde(default)]
    pub timeout: Option<Duration>,
}
