use crate::core::TicketId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One FIFO lane per ticket
///
/// tokio's mutex hands the lock out in the order it was requested, so
/// holding a lane's guard across persist + apply serializes mutations of
/// one ticket while different tickets proceed independently. The guarded
/// value counts how many mutations went through the lane since it was
/// opened. A lane nobody holds or waits on is dropped on the next `enter`.
#[derive(Debug, Default)]
pub(super) struct TicketQueue {
    lanes: Mutex<HashMap<TicketId, Arc<AsyncMutex<u64>>>>,
}

impl TicketQueue {
    pub(super) async fn enter(&self, id: &TicketId) -> OwnedMutexGuard<u64> {
        let lane = {
            let mut lanes = self.lanes.lock().unwrap_or_else(PoisonError::into_inner);
            // Lanes are only cloned under this lock, so a count of 1 means idle
            lanes.retain(|_, lane| Arc::strong_count(lane) > 1);
            Arc::clone(lanes.entry(id.clone()).or_default())
        };
        lane.lock_owned().await
    }

    /// Whether a mutation of `id` is running or waiting
    pub(super) fn is_busy(&self, id: &TicketId) -> bool {
        self.lanes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .is_some_and(|lane| Arc::strong_count(lane) > 1)
    }

    #[cfg(test)]
    fn open_lanes(&self) -> usize {
        self.lanes.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_lanes_are_per_ticket() {
        let queue = Arc::new(TicketQueue::default());
        let a = TicketId::from("a");
        let b = TicketId::from("b");

        let held = queue.enter(&a).await;

        let other = tokio::time::timeout(Duration::from_millis(10), queue.enter(&b)).await;
        assert!(other.is_ok());

        let same = tokio::time::timeout(Duration::from_millis(10), queue.enter(&a)).await;
        assert!(same.is_err());

        drop(held);
        assert_eq!(*queue.enter(&a).await, 0);
    }

    #[tokio::test]
    async fn test_idle_lanes_are_dropped() {
        let queue = TicketQueue::default();
        let a = TicketId::from("a");
        let b = TicketId::from("b");

        drop(queue.enter(&a).await);
        assert!(!queue.is_busy(&a));
        let held = queue.enter(&b).await;

        assert_eq!(queue.open_lanes(), 1);
        assert!(queue.is_busy(&b));
        drop(held);
        assert!(!queue.is_busy(&b));
    }
}
