use chrono::{DateTime, Duration, Utc};
use rand::{distr::Alphanumeric, Rng};
use std::collections::HashMap;
use std::str::FromStr;

use super::models::SessionModel;
use super::types::{keys, TimeoutClass};

const SESSION_ID_LENGTH: usize = 32;

pub(crate) fn generate_session_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_ID_LENGTH)
        .map(char::from)
        .collect()
}

/// Per-request view of a session.
///
/// Handlers receive one of these from [`SessionManager::load`], mutate it, and
/// hand it back to [`SessionManager::commit`]. Nothing is written to the store
/// until then.
///
/// [`SessionManager::load`]: super::manager::SessionManager::load
/// [`SessionManager::commit`]: super::manager::SessionManager::commit
#[derive(Debug, Clone)]
pub struct SessionContext {
    id: Option<String>,
    retired_id: Option<String>,
    values: HashMap<String, String>,
    idle_timeout: Duration,
    created_at: DateTime<Utc>,
    persisted: bool,
    modified: bool,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    /// An anonymous session with no backing record yet
    pub fn new() -> Self {
        Self {
            id: None,
            retired_id: None,
            values: HashMap::new(),
            idle_timeout: TimeoutClass::default().idle_timeout(),
            created_at: Utc::now(),
            persisted: false,
            modified: false,
        }
    }

    pub fn from_model(model: SessionModel) -> Self {
        Self {
            id: Some(model.id),
            retired_id: None,
            values: model.values,
            idle_timeout: model.idle_timeout,
            created_at: model.created_at,
            persisted: true,
            modified: false,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
        self.modified = true;
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let removed = self.values.remove(key);
        if removed.is_some() {
            self.modified = true;
        }
        removed
    }

    /// Drops every value; the backing record is deleted on commit
    pub fn clear(&mut self) {
        if !self.values.is_empty() || self.id.is_some() {
            self.modified = true;
        }
        self.values.clear();
    }

    /// Moves the session to a fresh id on commit, discarding the old record
    pub fn renew_id(&mut self) {
        if let Some(old) = self.id.take() {
            self.retired_id = Some(old);
        }
        self.persisted = false;
        self.modified = true;
    }

    pub fn set_timeout(&mut self, class: TimeoutClass) {
        self.set(keys::SESSION_TIMEOUT, class.to_string());
        self.idle_timeout = class.idle_timeout();
    }

    pub fn timeout_class(&self) -> Option<TimeoutClass> {
        self.get(keys::SESSION_TIMEOUT)
            .and_then(|raw| TimeoutClass::from_str(raw).ok())
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// The signed-in username, if any
    pub fn username(&self) -> Option<&str> {
        self.get(keys::USERNAME).filter(|name| !name.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.username().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Whether the current id names a record that was read from the store
    pub(crate) fn is_persisted(&self) -> bool {
        self.persisted
    }

    pub(crate) fn take_retired_id(&mut self) -> Option<String> {
        self.retired_id.take()
    }

    /// Assigns an id if needed and produces the record to persist
    pub(crate) fn to_model(&mut self) -> SessionModel {
        let id = self.id.get_or_insert_with(generate_session_id).clone();

        let mut model = SessionModel::new(id, self.values.clone(), self.idle_timeout);
        model.created_at = self.created_at;
        model
    }
}
