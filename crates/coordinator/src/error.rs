// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error kinds the coordinator distinguishes.
//!
//! Only a failure of the sync engine itself is ever surfaced to a caller
//! (and then only to the single caller that entered the in-flight window).
//! Tag-map reload and cache invalidation failures are recovered locally and
//! logged; follow-up/retry/catch-up failures are likewise swallowed and
//! logged under their own stable key.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of the tag-map loader. Recovered: the façade logs a warning and
/// continues the pass with the previously cached map.
#[derive(Debug, Error)]
pub enum TagMapReloadError {
    #[error("failed to read tag map file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse tag map file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure of the trailing thread-cache invalidation. Recovered: the
/// façade logs a warning and still returns the engine result to the caller.
#[derive(Debug, Error)]
#[error("thread cache invalidation failed: {0}")]
pub struct CacheInvalidationError(pub String);
