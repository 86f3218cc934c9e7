// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drives one Test through its full lifecycle: decide whether to execute
//! or replay, run the root node while pumping its events into the
//! "during" pipeline, then replay the persisted or buffered event stream
//! through the "after" pipeline, and finally promote or discard the
//! workspace.

use crate::error::EngineError;
use crate::launcher_factory::build_launcher;
use crate::pipeline::{self, StageContext};
use antler_config::{NodeConfig, ReportStageConfig, TestConfig};
use antler_core::{Duration as AntlerDuration, NodeId};
use antler_launch::BinaryRegistry;
use antler_node::{CancelCause, ChildSpec, Node};
use antler_report::{record_index_entry, AnalyzeSlot, AppendData, EventBuffer, IndexRegistry, PassThrough, WriteData};
use antler_store::{CodecRegistry, ResultDir, Workspace};
use antler_wire::Message;
use chrono::Utc;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const CHANNEL_CAPACITY: usize = 8;

/// What became of one Test.
#[derive(Debug)]
pub enum TestOutcome {
    /// The Test executed and its result directory was promoted.
    Ran { result_dir: PathBuf },
    /// The Test executed but produced no files worth keeping.
    RanEmpty,
    /// The Test was canceled by its configured timeout before it produced
    /// any file worth keeping.
    TimedOut,
    /// A caller-requested cancellation (e.g. the CLI's first Ctrl-C) cut the
    /// Test short before it produced any file worth keeping.
    Interrupted,
    /// Execution was skipped: a data file from a prior run already existed
    /// and the caller did not request an overwrite. The "after" pipeline
    /// still ran against the existing data.
    Skipped { result_dir: PathBuf },
    /// No data exists to replay and the caller asked only to report.
    NoDataToReport,
}

/// Why `execute` stopped a Test short of natural completion, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopCause {
    None,
    Timeout,
    Interrupted,
}

/// Where the "after" pipeline reads its events from.
enum ReplaySource {
    /// A data file under an already-promoted or still-open directory.
    DataFile(PathBuf),
    /// Events an execution just finished buffering in memory.
    Buffer(EventBuffer),
}

/// Owns the resources every Test in a run shares: the embedded worker
/// binaries, the codec registry, where results land on disk, and whether
/// existing data should be overwritten.
pub struct Engine {
    registry: Arc<BinaryRegistry>,
    codecs: CodecRegistry,
    results_root: PathBuf,
    force: bool,
    index: IndexRegistry,
    cancel: CancellationToken,
}

impl Engine {
    pub fn new(registry: Arc<BinaryRegistry>, codecs: CodecRegistry, results_root: impl Into<PathBuf>, force: bool) -> Self {
        Engine { registry, codecs, results_root: results_root.into(), force, index: Arc::new(Mutex::new(Vec::new())), cancel: CancellationToken::new() }
    }

    /// A handle a caller can use to request graceful cancellation of
    /// whichever Test is currently executing. Already-promoted results are
    /// unaffected; the Test in flight is given the same treatment as one
    /// that exceeded its own timeout.
    pub fn cancel_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// The navigational index accumulated across every Test run through
    /// this engine so far.
    pub fn index(&self) -> IndexRegistry {
        self.index.clone()
    }

    /// Runs a single Test to completion: the full lifecycle described in
    /// this module's doc comment.
    pub async fn run_test(&self, nodes: &[NodeConfig], test: &TestConfig, group_after: &[ReportStageConfig]) -> Result<TestOutcome, EngineError> {
        let expanded = expand_output_path(&test.output_path, test);
        let result_dir = ResultDir::new(self.results_root.join(&expanded));
        let previous = result_dir.previous().await;

        let has_existing_data = match (&test.data_file, &previous) {
            (Some(name), Some(prev)) => prev.join(name).is_file(),
            _ => false,
        };

        if has_existing_data && !self.force {
            let prev = previous.expect("checked above");
            info!(test = %test.id, "skipping execution, replaying prior data");
            let data_file = test.data_file.as_ref().expect("checked above");
            self.replay_after(test, group_after, &prev, ReplaySource::DataFile(prev.join(data_file))).await?;
            return Ok(TestOutcome::Skipped { result_dir: prev });
        }

        let scratch = self.results_root.join(format!("{expanded}.tmp"));
        let workspace = Workspace::create(scratch, previous).await?;

        let event_buffer: EventBuffer = Arc::new(Mutex::new(Vec::new()));
        let stop_cause = self.execute(nodes, test, &workspace, event_buffer.clone()).await?;

        let source = match &test.data_file {
            Some(name) => ReplaySource::DataFile(workspace.root().join(name)),
            None => ReplaySource::Buffer(event_buffer),
        };
        self.replay_after(test, group_after, workspace.root(), source).await?;

        if workspace_is_empty(&workspace).await? {
            let _ = tokio::fs::remove_dir_all(workspace.root()).await;
            return Ok(match stop_cause {
                StopCause::Timeout => TestOutcome::TimedOut,
                StopCause::Interrupted => TestOutcome::Interrupted,
                StopCause::None => TestOutcome::RanEmpty,
            });
        }

        let dest = result_dir.promote(workspace.root(), Utc::now()).await?;
        record_index_entry(&self.index, test.id.clone(), dest.clone());
        Ok(TestOutcome::Ran { result_dir: dest })
    }

    /// Replays a previously promoted result directory's data file through
    /// the "after" pipeline in place, without executing anything. Used by
    /// the `report` subcommand.
    pub async fn report_test(&self, test: &TestConfig, group_after: &[ReportStageConfig]) -> Result<TestOutcome, EngineError> {
        let expanded = expand_output_path(&test.output_path, test);
        let result_dir = ResultDir::new(self.results_root.join(&expanded));
        let Some(previous) = result_dir.previous().await else {
            return Ok(TestOutcome::NoDataToReport);
        };
        let Some(data_file) = &test.data_file else {
            return Ok(TestOutcome::NoDataToReport);
        };
        let path = previous.join(data_file);
        if !path.is_file() {
            return Ok(TestOutcome::NoDataToReport);
        }

        self.replay_after(test, group_after, &previous, ReplaySource::DataFile(path)).await?;
        Ok(TestOutcome::Skipped { result_dir: previous })
    }

    /// Runs the root node against `test.run`, registering a launcher for
    /// every node the tree directly hands off to, and pumps its emitted
    /// events through the "during" pipeline.
    async fn execute(&self, nodes: &[NodeConfig], test: &TestConfig, workspace: &Workspace, event_buffer: EventBuffer) -> Result<StopCause, EngineError> {
        let analyze_slot: AnalyzeSlot = Arc::new(Mutex::new(None));
        let ctx = StageContext { workspace, analyze_slot, codecs: &self.codecs, index: self.index.clone() };
        let mut during_stages = pipeline::build_chain(&test.during, &ctx)?;

        match &test.data_file {
            Some(name) => {
                let writer = workspace.create_writer(name).await?;
                during_stages.push(Box::new(WriteData::new(writer)));
            }
            None => during_stages.push(Box::new(AppendData::new(event_buffer))),
        }

        let (node_event_tx, mut node_event_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let mut node = Node::new(NodeId::from("root"), node_event_tx, self.registry.clone());
        for config in nodes {
            if test.run.child_nodes().contains(&&config.id) {
                let launcher = build_launcher(&config.launcher, config.id.clone(), self.registry.clone());
                node.register_child(ChildSpec { node: config.id.clone(), platform: config.platform.clone(), launcher });
            }
        }
        let node = Arc::new(node);

        // The pump has to be running *before* execution starts: the root
        // node emits into a bounded channel, and a runner that produces more
        // than a few events would block on a full channel forever if nothing
        // drained it until after execution finished.
        let (during_head_tx, during_head_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let pump_task = tokio::spawn(async move {
            while let Some((_, message)) = node_event_rx.recv().await {
                if message.is_event() && during_head_tx.send(message).await.is_err() {
                    break;
                }
            }
        });

        let node_for_exec = node.clone();
        let run = test.run.clone();
        let mut execute_handle = tokio::spawn(async move { node_for_exec.execute(&run).await });

        let timeout = test.timeout;
        let test_id = test.id.clone();
        let cancel = self.cancel.clone();
        // `node` is moved in here so the node's last `Arc` clone (and with
        // it the recorder's sender half) drops as soon as execution settles,
        // letting `pump_task` see the channel close without waiting for this
        // whole function to return.
        let exec_with_timeout = async move {
            let mut stop_cause = StopCause::None;
            let result = loop {
                let timeout_sleep = async {
                    match timeout {
                        Some(timeout) => tokio::time::sleep(timeout_as_std(timeout)).await,
                        None => std::future::pending().await,
                    }
                };
                tokio::select! {
                    result = &mut execute_handle => break result,
                    () = timeout_sleep, if stop_cause == StopCause::None => {
                        warn!(test = %test_id, "Test exceeded its configured timeout, canceling");
                        node.cancel(CancelCause::Timeout);
                        stop_cause = StopCause::Timeout;
                    }
                    () = cancel.cancelled(), if stop_cause == StopCause::None => {
                        warn!(test = %test_id, "Test canceled by operator request");
                        node.cancel(CancelCause::OperatorRequested);
                        stop_cause = StopCause::Interrupted;
                    }
                }
            };
            drop(node);
            (result, stop_cause)
        };

        let chain_future = pipeline::run_chain(during_stages, during_head_rx);
        let ((exec_result, stop_cause), _pump_result, chain_result) = tokio::join!(exec_with_timeout, pump_task, chain_future);
        chain_result?;

        match exec_result {
            Ok(Ok(())) => Ok(stop_cause),
            Ok(Err(err)) => Err(EngineError::from(err)),
            Err(join_err) => Err(EngineError::TaskPanicked(join_err.to_string())),
        }
    }

    /// Reads events from `source`, then tees them into the enclosing
    /// group's "after" stack and the Test's own "after" reporters. Both
    /// pipelines get their own `Workspace` handle rooted at `workspace_root`
    /// so a chart or index stage can write sidecar files there.
    async fn replay_after(&self, test: &TestConfig, group_after: &[ReportStageConfig], workspace_root: &Path, source: ReplaySource) -> Result<(), EngineError> {
        if test.after.is_empty() && group_after.is_empty() {
            return Ok(());
        }

        let workspace = Workspace::create(workspace_root, None).await?;
        let analyze_slot: AnalyzeSlot = Arc::new(Mutex::new(None));

        let group_ctx = StageContext { workspace: &workspace, analyze_slot: analyze_slot.clone(), codecs: &self.codecs, index: self.index.clone() };
        let mut group_stages = pipeline::build_chain(group_after, &group_ctx)?;
        if group_stages.is_empty() {
            group_stages.push(Box::new(PassThrough));
        }

        let test_ctx = StageContext { workspace: &workspace, analyze_slot, codecs: &self.codecs, index: self.index.clone() };
        let mut test_stages = pipeline::build_chain(&test.after, &test_ctx)?;
        if test_stages.is_empty() {
            test_stages.push(Box::new(PassThrough));
        }

        let (group_tx, group_rx) = mpsc::channel::<Message>(CHANNEL_CAPACITY);
        let (test_tx, test_rx) = mpsc::channel::<Message>(CHANNEL_CAPACITY);
        let (head_tx, mut head_rx) = mpsc::channel::<Message>(CHANNEL_CAPACITY);

        let tee_task = tokio::spawn(async move {
            while let Some(event) = head_rx.recv().await {
                if group_tx.send(event.clone()).await.is_err() {
                    break;
                }
                if test_tx.send(event).await.is_err() {
                    break;
                }
            }
        });

        let source_task = tokio::spawn(async move {
            match source {
                ReplaySource::DataFile(path) => {
                    let file = tokio::fs::File::open(&path).await.map_err(|e| antler_store::StoreError::io(&path, e))?;
                    antler_report::read_data(file, head_tx).await
                }
                ReplaySource::Buffer(buffer) => antler_report::range_data(buffer, head_tx).await,
            }
        });

        let group_future = pipeline::run_chain(group_stages, group_rx);
        let test_future = pipeline::run_chain(test_stages, test_rx);

        let (_tee_result, group_result, test_result, source_result) = tokio::join!(tee_task, group_future, test_future, source_task);
        group_result?;
        test_result?;
        source_result.map_err(|join_err| EngineError::TaskPanicked(join_err.to_string()))??;
        Ok(())
    }
}

fn timeout_as_std(duration: AntlerDuration) -> std::time::Duration {
    duration.into()
}

async fn workspace_is_empty(workspace: &Workspace) -> Result<bool, EngineError> {
    let mut entries = tokio::fs::read_dir(workspace.root()).await.map_err(|e| antler_store::StoreError::io(workspace.root(), e))?;
    Ok(entries.next_entry().await.map_err(|e| antler_store::StoreError::io(workspace.root(), e))?.is_none())
}

/// Expands `{key}` placeholders in a Test's output-path template against
/// its own compound identifier.
fn expand_output_path(template: &str, test: &TestConfig) -> String {
    let pairs: HashMap<&str, &str> = test.id.0.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '{' {
            let mut key = String::new();
            for next in chars.by_ref() {
                if next == '}' {
                    break;
                }
                key.push(next);
            }
            match pairs.get(key.as_str()) {
                Some(value) => out.push_str(value),
                None => {
                    out.push('{');
                    out.push_str(&key);
                    out.push('}');
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
