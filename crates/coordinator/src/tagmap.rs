// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tag-map loader: reads a tag-name→tag-id mapping from a file. The
//! façade calls this strictly before invoking the engine, never
//! concurrently with it, and recovers locally on failure (the previous
//! in-memory map is kept and the engine still runs).

use crate::error::TagMapReloadError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

#[async_trait]
pub trait TagMapLoader: Send + Sync + 'static {
    /// Read and parse the tag map at `path`, returning the full new
    /// mapping. Does not mutate any existing map in place — the caller
    /// (the coordinator façade) owns that.
    async fn load(&self, path: &Path) -> Result<HashMap<String, String>, TagMapReloadError>;
}

/// Loads a tag map from a JSON object file: `{"bug": "tag_123", ...}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFileTagMapLoader;

#[async_trait]
impl TagMapLoader for JsonFileTagMapLoader {
    async fn load(&self, path: &Path) -> Result<HashMap<String, String>, TagMapReloadError> {
        let contents =
            tokio::fs::read_to_string(path).await.map_err(|source| TagMapReloadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        serde_json::from_str(&contents).map_err(|source| TagMapReloadError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
#[path = "tagmap_tests.rs"]
mod tests;
