// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timer constants fixed by the design: stable values that operators and
//! tests depend on, not tunables.

use std::time::Duration;

/// Delay between a pass reporting `closes_deferred > 0` and its retry.
pub const DEFERRED_CLOSE_RETRY_DELAY: Duration = Duration::from_millis(30_000);

/// Slack added to a suppression window's `until` before firing the
/// catch-up pass, so it never races the instant suppression lifts.
pub const CATCH_UP_EPSILON: Duration = Duration::from_millis(1);
