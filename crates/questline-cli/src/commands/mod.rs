//! CLI command implementations. Thin layer: open the store, call into
//! questline-core, print JSON, persist.

pub mod config;
pub mod profile;
pub mod rival;
pub mod sync;
pub mod task;
pub mod workout;

use std::error::Error;
use std::path::PathBuf;

use chrono::Utc;
use questline_core::config::data_dir;
use questline_core::{
    Config, DispatchMode, Domain, HttpRemoteStore, LocalStore, RemoteStore, SyncEngine, SyncQueue,
};

pub(crate) fn store_path() -> Result<PathBuf, Box<dyn Error>> {
    Ok(data_dir()?.join("store.json"))
}

pub(crate) fn open_store(config: &Config) -> Result<LocalStore, Box<dyn Error>> {
    Ok(LocalStore::open(config.scoring.clone(), store_path()?)?)
}

/// Honor the dispatch mode a store mutation returned: immediate changes are
/// pushed before the process exits, debounced ones wait for the next
/// explicit `sync push`. A failed push is deferred, never a command failure.
pub(crate) fn dispatch(store: &mut LocalStore, config: &Config, domain: Domain, mode: DispatchMode) {
    let remote = HttpRemoteStore::new(config.sync.remote_url.clone());
    let engine = SyncEngine::new(remote, config.sync.retry_seconds);
    dispatch_with(store, &engine, config.sync.debounce_seconds, domain, mode);
}

pub(crate) fn dispatch_with<R: RemoteStore>(
    store: &mut LocalStore,
    engine: &SyncEngine<R>,
    debounce_seconds: i64,
    domain: Domain,
    mode: DispatchMode,
) {
    let now = Utc::now();
    let mut queue = SyncQueue::new(debounce_seconds);
    queue.schedule(domain, mode, now);
    engine.sync_due(store, &mut queue, now);
}
