// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A type-erased duplex so a `Node` can hold launchers of different kinds
//! (in-memory pipe, forked child's pipes, remote shell stdio) behind one
//! `Transport` type.

use tokio::io::{AsyncRead, AsyncWrite};

pub trait Duplex: AsyncRead + AsyncWrite + Send + Unpin {}
impl<T: AsyncRead + AsyncWrite + Send + Unpin> Duplex for T {}

pub type BoxedDuplex = Box<dyn Duplex>;
