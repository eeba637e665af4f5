//! Connection budget shared by user binds and pooled service binds.
//!
//! Every open connection holds one permit, idle ones included, so the number of
//! sockets never exceeds the semaphore size. When the budget is spent on idle
//! connections, the oldest idle one is closed to make room.

use super::DirectoryError;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};

struct Idle<C> {
    conn: C,
    since: Instant,
    permit: OwnedSemaphorePermit,
}

pub(super) struct Pool<C> {
    permits: Arc<Semaphore>,
    idle: Mutex<Vec<Idle<C>>>,
    idle_timeout: Duration,
    wait: Duration,
}

impl<C> Pool<C> {
    pub(super) fn new(size: usize, idle_timeout: Duration, wait: Duration) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(size)),
            idle: Mutex::new(Vec::new()),
            idle_timeout,
            wait,
        }
    }

    /// Reserve room for one new connection.
    ///
    /// # Errors
    /// Returns `DirectoryError::PoolExhausted` if no permit frees up within the wait time.
    pub(super) async fn acquire(&self) -> Result<OwnedSemaphorePermit, DirectoryError> {
        if let Ok(permit) = Arc::clone(&self.permits).try_acquire_owned() {
            return Ok(permit);
        }

        if let Some(permit) = self.reclaim().await {
            return Ok(permit);
        }

        match tokio::time::timeout(self.wait, Arc::clone(&self.permits).acquire_owned()).await {
            Ok(Ok(permit)) => Ok(permit),
            Ok(Err(_)) | Err(_) => Err(DirectoryError::PoolExhausted),
        }
    }

    /// Close the oldest idle connection and hand over its permit.
    async fn reclaim(&self) -> Option<OwnedSemaphorePermit> {
        let mut idle = self.idle.lock().await;
        evict_expired(&mut idle, self.idle_timeout, Instant::now());

        if let Ok(permit) = Arc::clone(&self.permits).try_acquire_owned() {
            return Some(permit);
        }

        if idle.is_empty() {
            None
        } else {
            Some(idle.remove(0).permit)
        }
    }

    /// Take the most recently used idle connection together with its permit.
    pub(super) async fn checkout(&self) -> Option<(C, OwnedSemaphorePermit)> {
        let mut idle = self.idle.lock().await;
        evict_expired(&mut idle, self.idle_timeout, Instant::now());
        idle.pop().map(|entry| (entry.conn, entry.permit))
    }

    pub(super) async fn checkin(&self, conn: C, permit: OwnedSemaphorePermit) {
        let mut idle = self.idle.lock().await;
        idle.push(Idle {
            conn,
            since: Instant::now(),
            permit,
        });
    }

    pub(super) fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }
}

fn evict_expired<C>(idle: &mut Vec<Idle<C>>, idle_timeout: Duration, now: Instant) {
    idle.retain(|entry| is_fresh(entry.since, now, idle_timeout));
}

fn is_fresh(since: Instant, now: Instant, idle_timeout: Duration) -> bool {
    now.saturating_duration_since(since) < idle_timeout
}
