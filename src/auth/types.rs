use serde::{Deserialize, Serialize};

/// JWT claims asserting a username
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenClaims {
    pub sub: String,
    pub jti: String, // Fresh per issued token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    pub iat: usize,
    pub exp: usize,
}

/// Response for the bearer-protected identity endpoint
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct WhoAmIResponse {
    pub username: String,
    pub token_id: String,
    pub expires_at: usize,
}
