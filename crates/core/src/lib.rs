// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! antler-core: metric primitives, node-relative clocks, and identifiers
//! shared by every other Antler crate.

pub mod clock;
pub mod error;
pub mod ids;
pub mod metric;

pub use clock::{Clock, FakeClock, SystemClock, Tinit};
pub use error::CoreError;
pub use ids::{FlowId, NodeId, PlatformTag, TestId};
pub use metric::{Bitrate, ByteCount, Duration};
