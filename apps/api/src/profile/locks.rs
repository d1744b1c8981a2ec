//! One writer per resume id.
//!
//! A profile rebuild holds its resume's lock for the whole pending → terminal
//! cycle, so concurrent rebuilds of the same resume run one after another.
//! Different resumes never contend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

#[derive(Default)]
pub struct ProfileLocks {
    inner: Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>,
}

/// Exclusive hold on one resume id. Dropping it releases the lock and prunes
/// idle entries, including when the owning future is cancelled.
pub struct ProfileLockGuard<'a> {
    locks: &'a ProfileLocks,
    held: Option<OwnedMutexGuard<()>>,
}

impl Drop for ProfileLockGuard<'_> {
    fn drop(&mut self) {
        self.held.take();
        self.locks.prune();
    }
}

impl ProfileLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other holder is working on `resume_id`.
    pub async fn acquire(&self, resume_id: Uuid) -> ProfileLockGuard<'_> {
        // Declared before the map entry is cloned so a cancelled wait still prunes.
        let mut guard = ProfileLockGuard {
            locks: self,
            held: None,
        };
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            map.entry(resume_id).or_default().clone()
        };
        guard.held = Some(lock.lock_owned().await);
        guard
    }

    /// Drops map entries nobody holds or waits on.
    fn prune(&self) {
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        map.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
