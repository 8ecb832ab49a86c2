use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use hashbrown::HashMap;
use tokio::time::Instant;
use wayfinder_core::navigator::Navigator;
use wayfinder_core::session::NavigationSession;

use crate::config::ServerConfig;

type SharedSession = Arc<Mutex<NavigationSession>>;

struct SessionEntry {
    session: SharedSession,
    last_touched: Instant,
}

/// State shared by all handlers: the engine plus the open sessions
///
/// Sessions untouched for longer than the configured TTL are dropped, and
/// the registry never holds more than `max_sessions` entries.
pub struct AppState<G, R> {
    pub navigator: Navigator<G, R>,
    sessions: Mutex<HashMap<u64, SessionEntry>>,
    next_id: AtomicU64,
    session_ttl: Duration,
    max_sessions: usize,
}

impl<G, R> AppState<G, R> {
    pub fn new(navigator: Navigator<G, R>, server: &ServerConfig) -> Self {
        Self {
            navigator,
            sessions: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            session_ttl: server.session_ttl(),
            max_sessions: server.max_sessions.max(1),
        }
    }

    pub fn create_session(&self) -> u64 {
        let now = Instant::now();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut sessions = self.sessions();

        evict_expired(&mut sessions, now, self.session_ttl);
        while sessions.len() >= self.max_sessions {
            let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_touched)
                .map(|(id, _)| *id)
            else {
                break;
            };
            tracing::info!(session = oldest, "session limit reached, dropping least recently used");
            if let Some(entry) = sessions.remove(&oldest) {
                close(&entry.session);
            }
        }

        sessions.insert(
            id,
            SessionEntry {
                session: Arc::new(Mutex::new(NavigationSession::new())),
                last_touched: now,
            },
        );
        id
    }

    /// Looks up a live session and marks it as used
    pub fn session(&self, id: u64) -> Option<SharedSession> {
        let now = Instant::now();
        let mut sessions = self.sessions();
        let expired = sessions
            .get(&id)
            .is_some_and(|entry| now.duration_since(entry.last_touched) > self.session_ttl);
        if expired {
            if let Some(entry) = sessions.remove(&id) {
                close(&entry.session);
            }
            return None;
        }
        let entry = sessions.get_mut(&id)?;
        entry.last_touched = now;
        Some(Arc::clone(&entry.session))
    }

    /// Removes the session; a navigate still running on it is invalidated
    pub fn remove_session(&self, id: u64) -> bool {
        let Some(entry) = self.sessions().remove(&id) else {
            return false;
        };
        close(&entry.session);
        true
    }

    /// Drops every session idle for longer than the TTL, returning how many
    pub fn evict_idle(&self) -> usize {
        let mut sessions = self.sessions();
        evict_expired(&mut sessions, Instant::now(), self.session_ttl)
    }

    pub fn session_count(&self) -> usize {
        self.sessions().len()
    }

    fn sessions(&self) -> std::sync::MutexGuard<'_, HashMap<u64, SessionEntry>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn evict_expired(sessions: &mut HashMap<u64, SessionEntry>, now: Instant, ttl: Duration) -> usize {
    let before = sessions.len();
    sessions.retain(|id, entry| {
        let live = now.duration_since(entry.last_touched) <= ttl;
        if !live {
            tracing::debug!(session = *id, "evicting idle session");
            close(&entry.session);
        }
        live
    });
    before - sessions.len()
}

fn close(session: &Mutex<NavigationSession>) {
    session.lock().unwrap_or_else(PoisonError::into_inner).clear();
}

/// Periodically evicts idle sessions until the state is dropped elsewhere
pub async fn reap_idle_sessions<G, R>(state: Arc<AppState<G, R>>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        let evicted = state.evict_idle();
        if evicted > 0 {
            tracing::info!(evicted, remaining = state.session_count(), "evicted idle sessions");
        }
        if Arc::strong_count(&state) == 1 {
            break;
        }
    }
}
