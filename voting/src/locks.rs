//! Per-session mutual exclusion.

use accord_types::SessionId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Registry of per-session locks.
///
/// A cast or finalize holds its session's lock for the whole
/// read-check-write sequence, so concurrent calls against the same session
/// serialize while different sessions proceed in parallel. Locks are created
/// on first use and live for the registry's lifetime; sessions are few and
/// short-lived enough that no eviction is needed.
pub struct SessionLocks {
    inner: Mutex<HashMap<SessionId, Arc<Mutex<()>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// The lock for a session, created if absent.
    pub fn acquire(&self, session: &SessionId) -> Arc<Mutex<()>> {
        let mut locks = self.inner.lock().unwrap();
        locks
            .entry(session.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

impl Default for SessionLocks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn same_session_returns_same_lock() {
        let locks = SessionLocks::new();
        let a = locks.acquire(&SessionId::new("vs-1"));
        let b = locks.acquire(&SessionId::new("vs-1"));
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn different_sessions_get_distinct_locks() {
        let locks = SessionLocks::new();
        let a = locks.acquire(&SessionId::new("vs-1"));
        let b = locks.acquire(&SessionId::new("vs-2"));
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn lock_serializes_critical_sections() {
        let locks = Arc::new(SessionLocks::new());
        let counter = Arc::new(Mutex::new(0u32));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let locks = locks.clone();
                let counter = counter.clone();
                thread::spawn(move || {
                    let lock = locks.acquire(&SessionId::new("vs-1"));
                    let _guard = lock.lock().unwrap();
                    let mut c = counter.lock().unwrap();
                    *c += 1;
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(*counter.lock().unwrap(), 8);
    }
}
