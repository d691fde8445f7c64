// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;

fn t(secs: u64) -> Instant {
    // An arbitrary fixed base so offsets compare predictably across tests.
    Instant::now() + Duration::from_secs(secs)
}

#[test]
fn inactive_never_blocks() {
    let state = SuppressionState::Inactive;
    assert!(!state.is_blocking(t(0)));
}

#[test]
fn active_blocks_strictly_before_until() {
    let mut state = SuppressionState::Inactive;
    state.suppress(t(100));
    assert!(state.is_blocking(t(50)));
    assert!(!state.is_blocking(t(100)));
    assert!(!state.is_blocking(t(150)));
}

#[test]
fn first_suppress_starts_with_catch_up_not_queued() {
    let mut state = SuppressionState::Inactive;
    state.suppress(t(100));
    assert_eq!(
        state,
        SuppressionState::Active { until: t(100), catch_up_queued: false }
    );
}

#[test]
fn mark_catch_up_queued_only_fires_once_per_window() {
    let mut state = SuppressionState::Inactive;
    state.suppress(t(100));
    assert!(state.mark_catch_up_queued_if_needed());
    assert!(!state.mark_catch_up_queued_if_needed());
    assert!(!state.mark_catch_up_queued_if_needed());
}

#[test]
fn extending_the_window_resets_catch_up_queued() {
    let mut state = SuppressionState::Inactive;
    state.suppress(t(100));
    state.mark_catch_up_queued_if_needed();
    state.suppress(t(200));
    assert_eq!(
        state,
        SuppressionState::Active { until: t(200), catch_up_queued: false }
    );
}

#[test]
fn shrinking_or_equal_window_preserves_catch_up_queued() {
    let mut state = SuppressionState::Inactive;
    state.suppress(t(100));
    state.mark_catch_up_queued_if_needed();
    state.suppress(t(50));
    assert_eq!(
        state,
        SuppressionState::Active { until: t(50), catch_up_queued: true }
    );

    state.suppress(t(50));
    assert_eq!(
        state,
        SuppressionState::Active { until: t(50), catch_up_queued: true }
    );
}

#[test]
fn until_reports_none_when_inactive() {
    assert_eq!(SuppressionState::Inactive.until(), None);
}
