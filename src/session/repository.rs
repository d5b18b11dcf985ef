use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument};

use super::models::SessionModel;
use crate::shared::AppError;

/// Backing key-value store for server-side sessions
#[async_trait]
pub trait SessionStore {
    async fn load(&self, session_id: &str) -> Result<Option<SessionModel>, AppError>;
    /// Inserts or replaces the session with the same id
    async fn save(&self, session: &SessionModel) -> Result<(), AppError>;
    /// Replaces an existing session only; returns false if it is gone
    async fn update(&self, session: &SessionModel) -> Result<bool, AppError>;
    /// Refreshes the last access time of an existing session only
    async fn touch(&self, session_id: &str) -> Result<bool, AppError>;
    /// Returns whether a session was removed
    async fn delete(&self, session_id: &str) -> Result<bool, AppError>;
    async fn cleanup_expired(&self) -> Result<u64, AppError>;
}

/// In-memory implementation of SessionStore for development and testing
///
/// Sessions live as long as the process.
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, SessionModel>>,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySessionStore {
    /// Creates a new empty in-memory store
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Creates an in-memory store with pre-populated sessions
    pub fn with_sessions(sessions: Vec<SessionModel>) -> Self {
        let session_map = sessions
            .into_iter()
            .map(|session| (session.id.clone(), session))
            .collect();

        Self {
            sessions: Mutex::new(session_map),
        }
    }

    /// Returns the current number of sessions in the store
    pub fn session_count(&self) -> usize {
        self.lock().len()
    }

    /// Checks if a session exists by ID (useful for debugging)
    pub fn has_session(&self, session_id: &str) -> bool {
        self.lock().contains_key(session_id)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, SessionModel>> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    #[instrument(skip(self))]
    async fn load(&self, session_id: &str) -> Result<Option<SessionModel>, AppError> {
        let session = self.lock().get(session_id).cloned();

        match &session {
            Some(s) => debug!(values = s.values.len(), "Session found in memory"),
            None => debug!("Session not found in memory"),
        }

        Ok(session)
    }

    #[instrument(skip(self, session), fields(session_id = %session.id))]
    async fn save(&self, session: &SessionModel) -> Result<(), AppError> {
        self.lock().insert(session.id.clone(), session.clone());

        debug!("Session saved in memory");
        Ok(())
    }

    #[instrument(skip(self, session), fields(session_id = %session.id))]
    async fn update(&self, session: &SessionModel) -> Result<bool, AppError> {
        let mut sessions = self.lock();
        let Some(existing) = sessions.get_mut(&session.id) else {
            debug!("Session no longer in memory, not updating");
            return Ok(false);
        };
        *existing = session.clone();

        debug!("Session updated in memory");
        Ok(true)
    }

    #[instrument(skip(self))]
    async fn touch(&self, session_id: &str) -> Result<bool, AppError> {
        let touched = match self.lock().get_mut(session_id) {
            Some(session) => {
                session.touch();
                true
            }
            None => false,
        };

        debug!(touched = touched, "Session touched in memory");
        Ok(touched)
    }

    #[instrument(skip(self))]
    async fn delete(&self, session_id: &str) -> Result<bool, AppError> {
        let removed = self.lock().remove(session_id).is_some();

        debug!(removed = removed, "Session deleted from memory");
        Ok(removed)
    }

    #[instrument(skip(self))]
    async fn cleanup_expired(&self) -> Result<u64, AppError> {
        let mut sessions = self.lock();
        let now = Utc::now();
        let initial_count = sessions.len();

        sessions.retain(|_, session| !session.is_expired_at(now));

        let removed_count = initial_count - sessions.len();
        debug!(
            expired_sessions_removed = removed_count,
            "Expired sessions cleaned up from memory"
        );
        Ok(removed_count as u64)
    }
}
