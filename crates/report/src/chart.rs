// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chart stages consume the single analysis event and render a template.
//! Rendering user-facing plots is out of scope here, so each stage only
//! produces the serde-able intermediate (`ChartData`) a real plotting
//! front-end would consume, as a JSON sidecar file.

use crate::analyze::AnalyzeSlot;
use crate::error::ReportError;
use crate::reporter::{drain_and_forward, EventStream, EventTx, Reporter};
use antler_core::FlowId;
use antler_store::Workspace;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChartKind {
    TimeSeries,
    FlowCompletionTime,
    TcpState,
}

impl ChartKind {
    fn file_stem(&self) -> &'static str {
        match self {
            ChartKind::TimeSeries => "chart-timeseries",
            ChartKind::FlowCompletionTime => "chart-fct",
            ChartKind::TcpState => "chart-tcpstate",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub kind: ChartKind,
    pub series: HashMap<FlowId, Vec<(f64, f64)>>,
}

/// Waits for `Analyze` to populate `slot`, then renders one chart per
/// configured `ChartKind` into the workspace as a JSON sidecar.
pub struct Chart<'w> {
    workspace: &'w Workspace,
    slot: AnalyzeSlot,
    kind: ChartKind,
}

impl<'w> Chart<'w> {
    pub fn new(workspace: &'w Workspace, slot: AnalyzeSlot, kind: ChartKind) -> Self {
        Chart { workspace, slot, kind }
    }

    fn build(&self) -> Option<ChartData> {
        let summary = self.slot.lock().expect("analyze slot poisoned").clone()?;
        let series = summary
            .flows
            .into_iter()
            .map(|(flow, flow_summary)| {
                let points = match self.kind {
                    ChartKind::TimeSeries => {
                        flow_summary.goodput.iter().map(|w| (w.t.as_secs_f64(), w.bits_per_sec)).collect()
                    }
                    ChartKind::FlowCompletionTime => flow_summary
                        .completion_time
                        .map(|t| vec![(0.0, t.as_secs_f64())])
                        .unwrap_or_default(),
                    ChartKind::TcpState => Vec::new(),
                };
                (flow, points)
            })
            .collect();
        Some(ChartData { kind: self.kind, series })
    }
}

#[async_trait]
impl<'w> Reporter for Chart<'w> {
    async fn run(&mut self, rx: EventStream, tx: Option<EventTx>) -> Result<(), ReportError> {
        drain_and_forward(rx, tx).await;

        let Some(data) = self.build() else { return Ok(()) };
        let rendered = serde_json::to_vec_pretty(&data)?;
        let name = format!("{}.json", self.kind.file_stem());
        let mut writer = self.workspace.create_writer(&name).await?;
        writer.write(&rendered).await?;
        writer.close().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::{AnalyzeSummary, FlowSummary, GoodputWindow};
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn renders_time_series_chart_from_analyze_summary() {
        let dir = tempdir().unwrap();
        let workspace = Workspace::create(dir.path(), None).await.unwrap();

        let mut flows = HashMap::new();
        flows.insert(
            FlowId::from("upload"),
            FlowSummary { goodput: vec![GoodputWindow { t: antler_core::Duration::ZERO, bits_per_sec: 1000.0 }], ..Default::default() },
        );
        let slot: AnalyzeSlot = Arc::new(Mutex::new(Some(AnalyzeSummary { flows })));

        let mut stage = Chart::new(&workspace, slot, ChartKind::TimeSeries);
        let (tx, rx) = mpsc::channel(1);
        drop(tx);
        stage.run(rx, None).await.unwrap();

        let contents = tokio::fs::read_to_string(dir.path().join("chart-timeseries.json")).await.unwrap();
        assert!(contents.contains("upload"));
    }
}
