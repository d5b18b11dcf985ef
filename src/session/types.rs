use chrono::Duration;
use strum_macros::{AsRefStr, Display, EnumString};

/// Well-known session keys
pub mod keys {
    pub const AUTH_TOKEN: &str = "AuthToken";
    pub const USERNAME: &str = "Username";
    pub const FIRST_NAME: &str = "FirstName";
    pub const LAST_NAME: &str = "LastName";
    pub const ADDRESS: &str = "Address";
    pub const PHONE: &str = "Phone";
    pub const SESSION_TIMEOUT: &str = "SessionTimeout";
}

/// Idle-timeout classification picked at login from the remember-me flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, AsRefStr)]
pub enum TimeoutClass {
    #[strum(serialize = "7Days")]
    SevenDays,
    #[default]
    #[strum(serialize = "30Minutes")]
    ThirtyMinutes,
}

impl TimeoutClass {
    pub fn from_remember_me(remember_me: bool) -> Self {
        if remember_me {
            TimeoutClass::SevenDays
        } else {
            TimeoutClass::ThirtyMinutes
        }
    }

    pub fn idle_timeout(self) -> Duration {
        match self {
            TimeoutClass::SevenDays => Duration::days(7),
            TimeoutClass::ThirtyMinutes => Duration::minutes(30),
        }
    }

    /// Remembered sessions outlive the browser, others end with it
    pub fn persistent_cookie(self) -> bool {
        matches!(self, TimeoutClass::SevenDays)
    }
}
