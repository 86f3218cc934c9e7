// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration as StdDuration;

#[test]
fn fake_clock_elapsed_tracks_advance() {
    let clock = FakeClock::new();
    let t0 = Tinit::sample(&clock);
    clock.advance(StdDuration::from_millis(250));
    let elapsed = t0.elapsed(&clock);
    assert_eq!(elapsed, Duration::from(StdDuration::from_millis(250)));
}

#[test]
fn fake_clock_epoch_advances_with_time() {
    let clock = FakeClock::new();
    let before = clock.epoch_ms();
    clock.advance(StdDuration::from_millis(10));
    assert_eq!(clock.epoch_ms(), before + 10);
}

#[test]
fn two_nodes_sampled_at_different_times_reconcile_by_epoch() {
    let clock = FakeClock::new();
    let first = Tinit::sample(&clock);
    clock.advance(StdDuration::from_secs(1));
    let second = Tinit::sample(&clock);
    assert!(second.epoch_ms() > first.epoch_ms());
}
