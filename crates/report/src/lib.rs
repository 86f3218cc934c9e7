// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! antler-report: the linear chain of reporter stages a Test's event stream
//! passes through. Each stage owns an inbound channel and, except for the
//! last stage in a chain, an outbound one it must forward every event it
//! doesn't consume to.

mod analyze;
mod chart;
mod emit_log;
mod emit_sysinfo;
mod encode;
mod error;
mod index;
mod reporter;
mod save_files;
mod terminal;

pub use analyze::{Analyze, AnalyzeSlot, AnalyzeSummary, FlowSummary, GoodputWindow, OwdPoint};
pub use chart::{Chart, ChartData, ChartKind};
pub use emit_log::EmitLog;
pub use emit_sysinfo::EmitSysInfo;
pub use encode::Encode;
pub use error::ReportError;
pub use index::{record as record_index_entry, Index, IndexEntry, IndexRegistry};
pub use reporter::{drain_and_forward, EventStream, EventTx, Reporter};
pub use save_files::SaveFiles;
pub use terminal::{read_data, range_data, AppendData, EventBuffer, PassThrough, WriteData};

#[cfg(test)]
mod report_tests;
