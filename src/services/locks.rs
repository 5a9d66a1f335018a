use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

const PRUNE_THRESHOLD: usize = 1024;

/// Per-user async mutexes serializing cart read-modify-write cycles and order
/// placement within this process.
#[derive(Clone, Default)]
pub struct UserLocks {
    inner: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, user_id: &str) -> OwnedMutexGuard<()> {
        let mutex = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            if map.len() >= PRUNE_THRESHOLD {
                // Only the map holds a reference: nobody is waiting on it.
                map.retain(|_, m| Arc::strong_count(m) > 1);
            }
            map.entry(user_id.to_string()).or_default().clone()
        };
        mutex.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn same_user_waits_other_users_do_not() {
        let locks = UserLocks::new();
        let held = locks.lock("u1").await;

        let other = tokio::time::timeout(Duration::from_millis(50), locks.lock("u2")).await;
        assert!(other.is_ok());

        let same = tokio::time::timeout(Duration::from_millis(50), locks.lock("u1")).await;
        assert!(same.is_err());

        drop(held);
        let same = tokio::time::timeout(Duration::from_millis(50), locks.lock("u1")).await;
        assert!(same.is_ok());
    }
}
