use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use time::Duration;
use tracing::{debug, info};

use crate::clock::SharedClock;
use crate::config::VoteConfig;
use crate::session::VoteSession;

pub type SessionHandle = Arc<Mutex<VoteSession>>;

/// Lazily populated map of slot key to session. Each session is guarded by
/// its own mutex, so operations on one key are serialized while distinct keys
/// proceed in parallel; the registry lock is only ever held for map
/// lookup/insert, never across a session operation.
#[derive(Debug)]
pub struct SessionRegistry {
    clock: SharedClock,
    config: Arc<VoteConfig>,
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl SessionRegistry {
    pub fn new(clock: SharedClock, config: VoteConfig) -> Self {
        Self {
            clock,
            config: Arc::new(config),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    pub fn config(&self) -> &VoteConfig {
        &self.config
    }

    /// Returns the session for `key`, activating an empty one on first
    /// reference.
    pub fn session(&self, key: &str) -> SessionHandle {
        if let Some(handle) = self.read_sessions().get(key) {
            return Arc::clone(handle);
        }

        let mut sessions = self.write_sessions();
        Arc::clone(sessions.entry(key.to_string()).or_insert_with(|| {
            debug!(key, "activating vote session");
            Arc::new(Mutex::new(VoteSession::new(
                key,
                Arc::clone(&self.clock),
                Arc::clone(&self.config),
            )))
        }))
    }

    /// Reads the clock, derives the slot key for the current period, and
    /// returns the key together with its session.
    pub fn session_for_now(&self) -> (String, SessionHandle) {
        let key = self.config.granularity.key_for(self.clock.now());
        let handle = self.session(&key);
        (key, handle)
    }

    pub fn with_session<R>(&self, key: &str, f: impl FnOnce(&mut VoteSession) -> R) -> R {
        let handle = self.session(key);
        let mut session = handle.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut session)
    }

    pub fn len(&self) -> usize {
        self.read_sessions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_sessions().is_empty()
    }

    /// Drops created sessions whose voting cutoff is more than `grace` in the
    /// past. Sessions that were referenced but never created carry no time
    /// anchor and are kept.
    pub fn evict_expired(&self, grace: Duration) -> usize {
        let now = self.clock.now();
        let mut sessions = self.write_sessions();
        let before = sessions.len();

        sessions.retain(|_, handle| {
            let session = handle.lock().unwrap_or_else(PoisonError::into_inner);
            match session.voting_cutoff() {
                Some(cutoff) => now <= cutoff + grace,
                None => true,
            }
        });

        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("evicted {evicted} expired vote sessions");
        }
        evicted
    }

    fn read_sessions(&self) -> RwLockReadGuard<'_, HashMap<String, SessionHandle>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_sessions(&self) -> RwLockWriteGuard<'_, HashMap<String, SessionHandle>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }
}
