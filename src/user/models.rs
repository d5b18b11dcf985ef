use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for the users table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct UserModel {
    pub username: String, // Unique key
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

/// Editable profile fields of a user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileFields {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

impl UserModel {
    pub fn new(username: String, password_hash: String) -> Self {
        Self {
            username,
            password_hash,
            first_name: None,
            last_name: None,
            address: None,
            phone: None,
        }
    }

    pub fn with_profile(mut self, profile: ProfileFields) -> Self {
        self.apply_profile(profile);
        self
    }

    /// Overwrites all four profile fields
    pub fn apply_profile(&mut self, profile: ProfileFields) {
        self.first_name = profile.first_name;
        self.last_name = profile.last_name;
        self.address = profile.address;
        self.phone = profile.phone;
    }

    pub fn profile(&self) -> ProfileFields {
        ProfileFields {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            address: self.address.clone(),
            phone: self.phone.clone(),
        }
    }
}
