use serde::{Deserialize, Serialize};

use crate::user::ProfileFields;

/// Form body of POST /Account/Register
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl RegisterRequest {
    pub fn profile(&self) -> ProfileFields {
        ProfileFields {
            first_name: non_blank(&self.first_name),
            last_name: non_blank(&self.last_name),
            address: non_blank(&self.address),
            phone: non_blank(&self.phone),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

/// Form body of POST /Account/Login
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: Option<String>,
}

impl LoginRequest {
    /// HTML checkboxes post "on"; other clients send "true"
    pub fn remember_me(&self) -> bool {
        matches!(
            self.remember_me.as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("true" | "on" | "1")
        )
    }
}

/// JSON body of POST /Account/UpdateProfile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
}

impl From<UpdateProfileRequest> for ProfileFields {
    fn from(request: UpdateProfileRequest) -> Self {
        ProfileFields {
            first_name: Some(request.first_name),
            last_name: Some(request.last_name),
            address: Some(request.address),
            phone: Some(request.phone),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct UpdateProfileResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl UpdateProfileResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Profile as served by GET /Account/Profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileView {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub phone: String,
}
