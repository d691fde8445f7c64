// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The coalescing register: tracks whether a pass is in flight, and if so,
//! the merged intent of callers queued for a follow-up pass. At most one
//! engine invocation is ever in flight; every caller that arrives while one
//! is running is coalesced into that follow-up rather than starting a
//! second, concurrent pass.

use crate::engine::StatusPoster;
use std::sync::Arc;

/// The origin of a `sync` call. `User` always bypasses suppression;
/// `Watcher` is subject to it. Coalescing upgrades monotonically from
/// `Watcher` to `User`, never the reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncOrigin {
    #[default]
    User,
    Watcher,
}

/// The merged intent of every caller coalesced into the pending follow-up.
#[derive(Clone)]
pub struct CoalescedIntent {
    pub status_poster: Option<Arc<dyn StatusPoster>>,
    pub origin: SyncOrigin,
}

impl CoalescedIntent {
    fn new(status_poster: Option<Arc<dyn StatusPoster>>, origin: SyncOrigin) -> Self {
        Self { status_poster, origin }
    }

    /// Upgrade this intent with a newly-arrived coalescing caller's
    /// parameters: the status poster is overwritten if one was provided,
    /// and the origin is upgraded from `Watcher` to `User` if the new
    /// caller is user-originated. Never downgrades `User` back to
    /// `Watcher`.
    fn upgrade(&mut self, status_poster: Option<Arc<dyn StatusPoster>>, origin: SyncOrigin) {
        if let Some(poster) = status_poster {
            self.status_poster = Some(poster);
        }
        if origin == SyncOrigin::User {
            self.origin = SyncOrigin::User;
        }
    }
}

/// Whether an engine pass is currently running and, if so, what (if
/// anything) has coalesced into the follow-up.
#[derive(Default)]
pub enum InFlight {
    #[default]
    Idle,
    Running(Option<CoalescedIntent>),
}

impl InFlight {
    /// Attempt to claim the in-flight slot. Returns `true` iff this call now
    /// owns the pass (was `Idle`); `false` if a pass is already running, in
    /// which case the caller must coalesce instead.
    pub fn try_enter(&mut self) -> bool {
        match self {
            InFlight::Idle => {
                *self = InFlight::Running(None);
                true
            }
            InFlight::Running(_) => false,
        }
    }

    /// Coalesce a caller's intent into the currently-running pass. A no-op
    /// if called while `Idle` (shouldn't happen: callers only coalesce
    /// after `try_enter` returns `false`).
    pub fn coalesce(&mut self, status_poster: Option<Arc<dyn StatusPoster>>, origin: SyncOrigin) {
        if let InFlight::Running(intent) = self {
            match intent {
                Some(existing) => existing.upgrade(status_poster, origin),
                None => *intent = Some(CoalescedIntent::new(status_poster, origin)),
            }
        }
    }

    /// Clear the in-flight slot, returning whatever intent had coalesced
    /// (`None` if nobody did). Used both on engine success (to spawn the
    /// follow-up) and on engine failure (to discard it, per the spec: a
    /// failed pass never spawns a follow-up even if callers coalesced).
    pub fn clear(&mut self) -> Option<CoalescedIntent> {
        match std::mem::take(self) {
            InFlight::Running(intent) => intent,
            InFlight::Idle => None,
        }
    }
}

#[cfg(test)]
#[path = "coalesce_tests.rs"]
mod tests;
