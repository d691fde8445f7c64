// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured logging handle and process-wide tracing setup.
//!
//! The coordinator's external contract (see the data model) models the
//! logger as an injected handle with `info`/`warn`/`error` methods rather
//! than a bare dependency on the `tracing` crate. [`SyncLog`] is that
//! handle: a cheap, cloneable wrapper around a [`tracing::Span`] carrying
//! the forum id, so every coordinator log line is scoped to its forum
//! without threading the id through every call site.

use std::fmt;
use tracing::Span;

/// Structured logger handle bound to one forum.
///
/// Cloning is cheap (an `Arc`-backed span clone); all clones share the same
/// underlying span context.
#[derive(Clone)]
pub struct SyncLog {
    span: Span,
}

impl SyncLog {
    pub fn new(forum_id: &str) -> Self {
        Self { span: tracing::info_span!("sync_coordinator", forum_id) }
    }

    /// A no-op logger scoped to an empty forum id, useful for tests that
    /// don't care about log output.
    pub fn test() -> Self {
        Self::new("test")
    }

    pub fn info(&self, message: &str) {
        let _enter = self.span.enter();
        tracing::info!("{}", message);
    }

    pub fn warn(&self, message: &str) {
        let _enter = self.span.enter();
        tracing::warn!("{}", message);
    }

    pub fn error(&self, message: &str) {
        let _enter = self.span.enter();
        tracing::error!("{}", message);
    }

    /// Like [`Self::warn`], but attaches a `%error` field — used for the
    /// stable log keys that operators and tests grep for.
    pub fn warn_with_error(&self, key: &str, error: &dyn fmt::Display) {
        let _enter = self.span.enter();
        tracing::warn!(%error, "{}", key);
    }
}

impl fmt::Debug for SyncLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncLog").finish_non_exhaustive()
    }
}

/// Install a process-wide `tracing` subscriber reading its filter from
/// `RUST_LOG` (defaulting to `info`). Intended to be called once from the
/// binary that starts the coordinator process; safe to call more than once
/// in a test binary since the second install is simply ignored.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
