//! Per-browser session state: display history and the last calendar built.
//!
//! Sessions live only in memory and are keyed by a random cookie value.

use axum::http::{header, HeaderMap};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::request::Mode;

pub const SESSION_COOKIE: &str = "smartgrind_session";
pub const MAX_HISTORY: usize = 50;
/// Idle time after which a session is dropped
pub const SESSION_TTL: Duration = Duration::from_secs(2 * 60 * 60);
pub const MAX_SESSIONS: usize = 1000;

/// One rendered user action, success or failure
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub mode: Mode,
    pub input: String,
    pub output: Option<String>,
    pub error: Option<String>,
    pub at: DateTime<Local>,
}

impl HistoryEntry {
    pub fn success(mode: Mode, input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            mode,
            input: input.into(),
            output: Some(output.into()),
            error: None,
            at: Local::now(),
        }
    }

    pub fn failure(mode: Mode, input: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            mode,
            input: input.into(),
            output: None,
            error: Some(error.into()),
            at: Local::now(),
        }
    }
}

#[derive(Debug)]
struct Session {
    history: Vec<HistoryEntry>,
    calendar: Option<Vec<u8>>,
    last_seen: Instant,
}

impl Session {
    fn new() -> Self {
        Self {
            history: Vec::new(),
            calendar: None,
            last_seen: Instant::now(),
        }
    }
}

/// In-memory sessions. Idle ones expire after `ttl`; when `max_sessions` is
/// reached the least recently seen session makes room for a new one.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    ttl: Duration,
    max_sessions: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_limits(SESSION_TTL, MAX_SESSIONS)
    }

    pub fn with_limits(ttl: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    pub async fn record(&self, id: Uuid, entry: HistoryEntry) {
        self.update(id, |session| {
            session.history.push(entry);
            if session.history.len() > MAX_HISTORY {
                let excess = session.history.len() - MAX_HISTORY;
                session.history.drain(..excess);
            }
        })
        .await;
    }

    pub async fn history(&self, id: Uuid) -> Vec<HistoryEntry> {
        self.sessions
            .read()
            .await
            .get(&id)
            .map(|session| session.history.clone())
            .unwrap_or_default()
    }

    pub async fn set_calendar(&self, id: Uuid, ics: Vec<u8>) {
        self.update(id, |session| session.calendar = Some(ics)).await;
    }

    pub async fn calendar(&self, id: Uuid) -> Option<Vec<u8>> {
        self.sessions
            .read()
            .await
            .get(&id)
            .and_then(|session| session.calendar.clone())
    }

    /// Drop the stored calendar so a failed upload cannot serve a stale file
    pub async fn clear_calendar(&self, id: Uuid) {
        if let Some(session) = self.sessions.write().await.get_mut(&id) {
            session.calendar = None;
        }
    }

    /// Forget everything held for a session
    pub async fn reset(&self, id: Uuid) {
        self.sessions.write().await.remove(&id);
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    async fn update<F>(&self, id: Uuid, apply: F)
    where
        F: FnOnce(&mut Session),
    {
        let mut sessions = self.sessions.write().await;
        self.evict(&mut sessions, id);
        let session = sessions.entry(id).or_insert_with(Session::new);
        session.last_seen = Instant::now();
        apply(session);
    }

    fn evict(&self, sessions: &mut HashMap<Uuid, Session>, incoming: Uuid) {
        let before = sessions.len();
        let ttl = self.ttl;
        sessions.retain(|_, session| session.last_seen.elapsed() < ttl);

        if !sessions.contains_key(&incoming) {
            while sessions.len() >= self.max_sessions {
                let oldest = sessions
                    .iter()
                    .min_by_key(|(_, session)| session.last_seen)
                    .map(|(id, _)| *id);
                match oldest {
                    Some(id) => {
                        sessions.remove(&id);
                    }
                    None => break,
                }
            }
        }

        let evicted = before - sessions.len();
        if evicted > 0 {
            log::debug!("Evicted {} sessions ({} remain)", evicted, sessions.len());
        }
    }
}

/// Read the session id from the request cookies, or mint a new one.
pub fn session_id(headers: &HeaderMap) -> Uuid {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
        .unwrap_or_else(Uuid::new_v4)
}

pub fn session_cookie(id: Uuid) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_id_from_cookie() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {}={}", SESSION_COOKIE, id)).unwrap(),
        );
        assert_eq!(session_id(&headers), id);
    }

    #[test]
    fn test_session_id_minted_when_missing_or_invalid() {
        let headers = HeaderMap::new();
        let first = session_id(&headers);
        let second = session_id(&headers);
        assert_ne!(first, second);

        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("smartgrind_session=not-a-uuid"),
        );
        assert_ne!(session_id(&headers).to_string(), "not-a-uuid");
    }

    #[test]
    fn test_session_cookie_format() {
        let id = Uuid::nil();
        assert_eq!(
            session_cookie(id),
            "smartgrind_session=00000000-0000-0000-0000-000000000000; Path=/; HttpOnly; SameSite=Lax"
        );
    }

    #[tokio::test]
    async fn test_history_is_per_session() {
        let store = SessionStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        store
            .record(alice, HistoryEntry::success(Mode::Roadmap, "Learn Rust", "Week 1"))
            .await;
        store
            .record(bob, HistoryEntry::failure(Mode::Summarize, "", "no notes"))
            .await;

        let history = store.history(alice).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].output.as_deref(), Some("Week 1"));
        assert_eq!(store.history(bob).await[0].error.as_deref(), Some("no notes"));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_history_is_capped() {
        let store = SessionStore::new();
        let id = Uuid::new_v4();
        for i in 0..(MAX_HISTORY + 5) {
            store
                .record(id, HistoryEntry::success(Mode::Summarize, format!("n{}", i), "ok"))
                .await;
        }
        let history = store.history(id).await;
        assert_eq!(history.len(), MAX_HISTORY);
        assert_eq!(history[0].input, "n5");
    }

    #[tokio::test]
    async fn test_calendar_and_reset() {
        let store = SessionStore::new();
        let id = Uuid::new_v4();
        assert!(store.calendar(id).await.is_none());

        store.set_calendar(id, b"BEGIN:VCALENDAR".to_vec()).await;
        assert_eq!(store.calendar(id).await.unwrap(), b"BEGIN:VCALENDAR".to_vec());

        store.reset(id).await;
        assert!(store.calendar(id).await.is_none());
        assert!(store.history(id).await.is_empty());
    }

    #[tokio::test]
    async fn test_session_count_is_capped() {
        let store = SessionStore::with_limits(SESSION_TTL, 10);
        for _ in 0..200 {
            store
                .record(Uuid::new_v4(), HistoryEntry::failure(Mode::Summarize, "", "no notes"))
                .await;
        }
        assert_eq!(store.len().await, 10);
    }

    #[tokio::test]
    async fn test_least_recently_seen_session_evicted_first() {
        let store = SessionStore::with_limits(SESSION_TTL, 2);
        let (first, second, third) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        store.set_calendar(first, b"first".to_vec()).await;
        std::thread::sleep(Duration::from_millis(5));
        store.set_calendar(second, b"second".to_vec()).await;
        std::thread::sleep(Duration::from_millis(5));
        store.set_calendar(first, b"first again".to_vec()).await;
        std::thread::sleep(Duration::from_millis(5));
        store.set_calendar(third, b"third".to_vec()).await;

        assert_eq!(store.len().await, 2);
        assert!(store.calendar(second).await.is_none());
        assert_eq!(store.calendar(first).await.unwrap(), b"first again".to_vec());
        assert!(store.calendar(third).await.is_some());
    }

    #[tokio::test]
    async fn test_idle_sessions_expire() {
        let store = SessionStore::with_limits(Duration::from_millis(20), MAX_SESSIONS);
        let idle = Uuid::new_v4();
        store
            .record(idle, HistoryEntry::success(Mode::Roadmap, "Learn Rust", "Week 1"))
            .await;

        std::thread::sleep(Duration::from_millis(50));
        store
            .record(Uuid::new_v4(), HistoryEntry::success(Mode::Roadmap, "Learn Go", "Week 1"))
            .await;

        assert_eq!(store.len().await, 1);
        assert!(store.history(idle).await.is_empty());
    }

    #[tokio::test]
    async fn test_clear_calendar_keeps_history() {
        let store = SessionStore::new();
        let id = Uuid::new_v4();
        store.set_calendar(id, b"BEGIN:VCALENDAR".to_vec()).await;
        store
            .record(id, HistoryEntry::failure(Mode::ScheduleFromCsv, "bad.csv", "parse"))
            .await;

        store.clear_calendar(id).await;
        assert!(store.calendar(id).await.is_none());
        assert_eq!(store.history(id).await.len(), 1);

        store.clear_calendar(Uuid::new_v4()).await;
        assert_eq!(store.len().await, 1);
    }
}
