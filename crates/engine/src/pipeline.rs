// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Turns a Test's declarative `ReportStageConfig` list into live
//! `antler_report` reporter objects, and drives a chain of them to
//! completion. Every inter-stage channel uses the same small fixed
//! capacity so a slow reporter's backpressure reaches the stage above it
//! rather than buffering without bound.

use crate::error::EngineError;
use antler_config::{ChartKindConfig, ReportStageConfig};
use antler_report::{
    drain_and_forward, Analyze, AnalyzeSlot, Chart, ChartKind, Encode, EventStream, EventTx, Index, IndexRegistry, Reporter,
};
use antler_store::{CodecRegistry, Workspace};
use std::future::Future;
use std::pin::Pin;
use tokio::sync::mpsc;

const CHANNEL_CAPACITY: usize = 8;

/// Handles every stage needs but has no business owning itself.
pub struct StageContext<'w> {
    pub workspace: &'w Workspace,
    pub analyze_slot: AnalyzeSlot,
    pub codecs: &'w CodecRegistry,
    pub index: IndexRegistry,
}

fn map_chart_kind(kind: ChartKindConfig) -> ChartKind {
    match kind {
        ChartKindConfig::TimeSeries => ChartKind::TimeSeries,
        ChartKindConfig::FlowCompletionTime => ChartKind::FlowCompletionTime,
        ChartKindConfig::TcpState => ChartKind::TcpState,
    }
}

fn build_stage<'w>(cfg: &ReportStageConfig, ctx: &StageContext<'w>) -> Result<Box<dyn Reporter + Send + 'w>, EngineError> {
    Ok(match cfg {
        ReportStageConfig::Analyze => Box::new(Analyze::new(ctx.analyze_slot.clone())),
        ReportStageConfig::SaveFiles { consume } => Box::new(antler_report::SaveFiles::new(ctx.workspace, *consume)),
        ReportStageConfig::EmitLog { sort_before_emit } => {
            let path = ctx.workspace.root().join("antler.log");
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| antler_store::StoreError::io(&path, e))?;
            Box::new(antler_report::EmitLog::new(file, *sort_before_emit))
        }
        ReportStageConfig::EmitSysInfo => Box::new(antler_report::EmitSysInfo::new(ctx.workspace)),
        ReportStageConfig::Chart { chart } => Box::new(Chart::new(ctx.workspace, ctx.analyze_slot.clone(), map_chart_kind(*chart))),
        ReportStageConfig::Encode { mappings } => {
            let targets = mappings
                .iter()
                .map(|(name, ext)| {
                    let source = ctx.workspace.root().join(name);
                    let dest = ctx.workspace.root().join(format!("{name}.{ext}"));
                    (source, dest)
                })
                .collect();
            Box::new(Encode::new(ctx.codecs, targets))
        }
        ReportStageConfig::Index => Box::new(Index::new(ctx.workspace, ctx.index.clone())),
    })
}

/// Builds the live stage chain for a configured stage list, in order.
pub fn build_chain<'w>(stages: &[ReportStageConfig], ctx: &StageContext<'w>) -> Result<Vec<Box<dyn Reporter + Send + 'w>>, EngineError> {
    stages.iter().map(|cfg| build_stage(cfg, ctx)).collect()
}

/// Runs every stage in `stages` concurrently, wiring a bounded channel
/// between each consecutive pair, and returns the first stage error if
/// any. Stages run as plain futures rather than spawned tasks since most
/// borrow from the enclosing workspace and can't satisfy `'static`.
pub async fn run_chain<'w>(stages: Vec<Box<dyn Reporter + Send + 'w>>, head_rx: EventStream) -> Result<(), antler_report::ReportError> {
    if stages.is_empty() {
        drain_and_forward(head_rx, None).await;
        return Ok(());
    }

    let stage_count = stages.len();
    let mut rx = head_rx;
    let mut running: Vec<Pin<Box<dyn Future<Output = Result<(), antler_report::ReportError>> + Send + 'w>>> = Vec::new();

    for (index, mut stage) in stages.into_iter().enumerate() {
        let (tx, next_rx): (Option<EventTx>, Option<EventStream>) = if index + 1 < stage_count {
            let (tx, next_rx) = mpsc::channel(CHANNEL_CAPACITY);
            (Some(tx), Some(next_rx))
        } else {
            (None, None)
        };
        let this_rx = rx;
        running.push(Box::pin(async move { stage.run(this_rx, tx).await }));
        if let Some(next_rx) = next_rx {
            rx = next_rx;
        }
    }

    let results = futures::future::join_all(running).await;
    results.into_iter().find_map(|r| r.err()).map_or(Ok(()), Err)
}
