// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative description of a report pipeline stage. `antler-engine`
//! turns these into the concrete `antler_report` reporter objects, which
//! need live handles (a workspace, an analysis slot) this crate has no
//! business owning.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKindConfig {
    TimeSeries,
    FlowCompletionTime,
    TcpState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportStageConfig {
    Analyze,
    SaveFiles {
        #[serde(default)]
        consume: bool,
    },
    EmitLog {
        #[serde(default)]
        sort_before_emit: bool,
    },
    EmitSysInfo,
    Chart {
        chart: ChartKindConfig,
    },
    Encode {
        /// Maps a written file name to the extension its codec should
        /// produce, e.g. `"cap.pcap" -> "gz"`.
        mappings: Vec<(String, String)>,
    },
    Index,
}
