use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// Stored form of a server-side session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionModel {
    pub id: String, // Opaque id carried by the session cookie
    pub values: HashMap<String, String>,
    pub idle_timeout: Duration,
    pub created_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
}

impl SessionModel {
    pub fn new(id: String, values: HashMap<String, String>, idle_timeout: Duration) -> Self {
        let now = Utc::now();

        Self {
            id,
            values,
            idle_timeout,
            created_at: now,
            last_accessed: now,
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.last_accessed + self.idle_timeout
    }

    /// A session expires once it has been idle longer than its timeout
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at()
    }

    /// Updates the last accessed timestamp
    pub fn touch(&mut self) {
        self.last_accessed = Utc::now();
    }
}
