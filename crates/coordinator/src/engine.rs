// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The sync engine adapter: the opaque collaborator that actually walks
//! tasks and threads and issues platform API calls. The coordinator never
//! implements this — it only knows the interface contract described here
//! and invokes it once per pass.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// A capability the engine may call, once, to post a human-readable status
/// line on completion. The coordinator only ever stores and forwards this
/// handle — it never calls `post` itself.
#[async_trait]
pub trait StatusPoster: Send + Sync + 'static {
    async fn post(&self, message: &str);
}

/// The parameter record passed to the engine for a single pass.
///
/// `Client`, `Guild`, and `Store` are the platform-client, forum-scope, and
/// task-store handles respectively — opaque to the coordinator, which only
/// owns and forwards them.
pub struct EngineParams<Client, Guild, Store, Runtime> {
    pub client: Client,
    pub guild: Guild,
    pub forum_id: String,
    /// A by-value snapshot of the tag map taken before the engine runs;
    /// mutations to the coordinator's live map after this point must not be
    /// observable by the engine.
    pub tag_map: HashMap<String, String>,
    pub task_store: Store,
    pub log: syncd_core::SyncLog,
    pub status_poster: Option<Arc<dyn StatusPoster>>,
    pub mention_user_id: Option<String>,
    pub auto_tag: bool,
    pub auto_tag_model: String,
    /// Opaque runtime-adapter handle, forwarded to the engine unchanged.
    pub runtime: Runtime,
}

/// Counts produced by one engine pass. Every field besides
/// `closes_deferred` is opaque to the coordinator — it forwards them to the
/// caller unchanged and never inspects them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncResult {
    pub threads_created: u32,
    pub starter_messages_updated: u32,
    pub threads_renamed: u32,
    pub threads_archived: u32,
    pub status_fixes: u32,
    pub tag_updates: u32,
    pub warnings: u32,
    pub reconciliations: u32,
    pub orphaned_threads: u32,
    /// Non-zero triggers exactly one deferred-close retry pass 30s later.
    pub closes_deferred: u32,
}

/// The sync engine adapter contract (§4.5 of the design).
///
/// The coordinator makes no assumption about the engine's internal
/// concurrency beyond that `run_sync` returns, or fails, in bounded time.
#[async_trait]
pub trait SyncEngine<Client, Guild, Store, Runtime>: Send + Sync + 'static
where
    Client: Send + Sync + 'static,
    Guild: Send + Sync + 'static,
    Store: Send + Sync + 'static,
    Runtime: Send + Sync + 'static,
{
    type Error: std::error::Error + Send + Sync + 'static;

    async fn run_sync(
        &self,
        params: EngineParams<Client, Guild, Store, Runtime>,
    ) -> Result<SyncResult, Self::Error>;
}
