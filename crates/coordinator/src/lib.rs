// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! syncd-coordinator: the concurrency core of a chat-platform assistant
//! that mirrors a local task database into per-task threads on a group-chat
//! forum.
//!
//! This crate owns exactly three things: single-flight coalescing of
//! concurrent `sync` callers with upgrade semantics, origin-aware
//! suppression of watcher-triggered passes, and a deferred-close retry
//! timer. The sync engine itself — the code that walks tasks and threads
//! and issues platform API calls — is an opaque collaborator behind the
//! [`SyncEngine`] trait; this crate never implements it.

mod cache;
mod coalesce;
mod constants;
mod coordinator;
mod engine;
mod error;
mod runtime_handle;
mod suppression;
mod tagmap;

pub use cache::{NoopCache, ThreadCacheHandle};
pub use coalesce::{CoalescedIntent, InFlight, SyncOrigin};
pub use coordinator::{Coordinator, CoordinatorOptions};
pub use engine::{EngineParams, StatusPoster, SyncEngine, SyncResult};
pub use error::{CacheInvalidationError, TagMapReloadError};
pub use runtime_handle::{BoxedFuture, RuntimeHandle, TokioRuntimeHandle};
pub use suppression::SuppressionState;
pub use tagmap::{JsonFileTagMapLoader, TagMapLoader};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
