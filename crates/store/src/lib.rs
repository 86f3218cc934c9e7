// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! antler-store: where a Test's result files land. Writes go through a
//! scratch workspace first; on close, a file is either hard-linked against
//! an identical file from the previous result (content compared by digest)
//! or moved into place, and the whole directory is only promoted into view
//! once every writer has closed cleanly.

mod codec;
mod error;
mod result_dir;
mod workspace;

pub use codec::CodecRegistry;
pub use error::StoreError;
pub use result_dir::ResultDir;
pub use workspace::{Workspace, Writer};
