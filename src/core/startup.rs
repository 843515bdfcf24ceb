use anyhow::{bail, Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::core::config::StorageConfig;
use crate::stores::kv::KvStore;
use crate::stores::memory_store::MemoryStore;
use crate::stores::redb_store::RedbStore;
use crate::stores::session_store::SessionRegistry;
use crate::stores::user_store::USER_TABLE;
use crate::utils::time::unix_now;

/// Open the configured key-value backend
pub fn open_store(config: &StorageConfig) -> Result<Arc<dyn KvStore>> {
    let store: Arc<dyn KvStore> = match config.backend.as_str() {
        "redb" => {
            let store = RedbStore::open(&config.path, &[USER_TABLE]).context(format!(
                "Failed to open redb store at '{}'",
                config.path.display()
            ))?;
            Arc::new(store)
        }
        "memory" => Arc::new(MemoryStore::new()),
        other => bail!("Unknown storage backend '{}'", other),
    };

    info!(
        backend = %config.backend,
        path = %config.path.display(),
        users = store.len(USER_TABLE).unwrap_or(0),
        "User store opened"
    );

    Ok(store)
}

/// Spawn a background task that periodically drops idle sessions
pub fn spawn_session_cleanup(sessions: Arc<SessionRegistry>, cleanup_interval: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(cleanup_interval));

        loop {
            interval.tick().await;

            let removed = sessions.cleanup_expired(unix_now());
            if removed > 0 {
                info!(
                    removed_sessions = removed,
                    active_sessions = sessions.len(),
                    "Session cleanup completed"
                );
            } else {
                debug!("Session cleanup completed, no idle sessions found");
            }
        }
    });
}
