use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per event id, created on first use.
#[derive(Clone, Default)]
pub struct EventLocks(Arc<Mutex<HashMap<i64, Arc<Mutex<()>>>>>);

impl EventLocks {
    pub async fn acquire(&self, event_id: i64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.0.lock().await;
            locks.entry(event_id).or_default().clone()
        };

        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_same_event_is_exclusive() {
        let locks = EventLocks::default();
        let guard = locks.acquire(1).await;

        let other = locks.clone();
        let waiting = tokio::spawn(async move {
            let _guard = other.acquire(1).await;
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiting.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), waiting)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_different_events_do_not_contend() {
        let locks = EventLocks::default();
        let _first = locks.acquire(1).await;

        tokio::time::timeout(Duration::from_secs(1), locks.acquire(2))
            .await
            .unwrap();
    }
}
