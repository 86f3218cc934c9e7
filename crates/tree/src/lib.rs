// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! antler-tree: the Run tree. A pure, side-effect-free data structure that
//! describes serial/parallel scheduling and child-node placement; walking it
//! is left to the engine and node runtimes, which are the only parts that
//! know how to actually launch anything.

mod runner_spec;
mod run;
mod walk;

pub use run::Run;
pub use runner_spec::{
    LengthPolicy, PacketEndpoint, RunnerSpec, SenderSchedule, StreamEndpoint, SystemCommand,
    WaitPolicy,
};
pub use walk::{walk, Visitor};

#[cfg(test)]
mod tree_tests;
