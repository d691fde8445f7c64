// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The thread cache: a module-level singleton (owned elsewhere) that the
//! coordinator invalidates on the trailing edge of every successful engine
//! pass, and never on failure or skip. Invalidation is idempotent.

use async_trait::async_trait;
use crate::error::CacheInvalidationError;

#[async_trait]
pub trait ThreadCacheHandle: Send + Sync + 'static {
    async fn invalidate(&self) -> Result<(), CacheInvalidationError>;
}

/// A cache handle that always succeeds and does nothing, for deployments
/// that don't need a thread cache (or single-process test fixtures that
/// don't care about invalidation counts).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

#[async_trait]
impl ThreadCacheHandle for NoopCache {
    async fn invalidate(&self) -> Result<(), CacheInvalidationError> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
