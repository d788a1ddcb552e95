use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async lock per chat session. Holding the guard for the duration of a
/// turn guarantees no two interpreter invocations for the same session run
/// concurrently; a fast follow-up message waits for the previous turn's
/// memory write to land.
#[derive(Clone, Default)]
pub struct SessionLocks {
    inner: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl SessionLocks {
    pub async fn acquire(&self, session_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            // A strong count of 1 means no guard is outstanding for that
            // session; dropping those entries keeps the map bounded by the
            // number of concurrently active sessions.
            map.retain(|_, lock| Arc::strong_count(lock) > 1);
            map.entry(session_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };

        lock.lock_owned().await
    }
}
