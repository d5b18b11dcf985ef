use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, error, instrument};
use uuid::Uuid;

use super::types::TokenClaims;
use crate::config::JwtSettings;
use crate::shared::AppError;

/// Issued tokens are valid for this long, independent of any session
pub const TOKEN_LIFETIME_HOURS: i64 = 2;

/// Issues and validates HS256 bearer tokens
#[derive(Clone)]
pub struct TokenIssuer {
    settings: JwtSettings,
}

impl TokenIssuer {
    pub fn new(settings: JwtSettings) -> Self {
        Self { settings }
    }

    /// Creates a signed token for `username`, expiring two hours from now
    #[instrument(skip(self))]
    pub fn issue(&self, username: &str) -> Result<String, AppError> {
        self.issue_at(username, Utc::now())
    }

    pub(crate) fn issue_at(&self, username: &str, now: DateTime<Utc>) -> Result<String, AppError> {
        let key = self.signing_key()?;
        let exp = (now + Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp() as usize;

        let claims = TokenClaims {
            sub: username.to_string(),
            jti: Uuid::new_v4().to_string(),
            iss: self.settings.issuer.clone(),
            aud: self.settings.audience.clone(),
            iat: now.timestamp() as usize,
            exp,
        };

        debug!(jti = %claims.jti, exp_timestamp = exp, "Signing JWT token");

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(key.as_bytes()),
        )
        .map_err(|e| {
            debug!(error = %e, "Failed to encode JWT token");
            AppError::JwtError(e.to_string())
        })
    }

    /// Checks signature, expiry, issuer and audience and returns the claims
    #[instrument(skip(self, token))]
    pub fn validate(&self, token: &str) -> Result<TokenClaims, AppError> {
        let key = self.signing_key()?;

        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(issuer) = &self.settings.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &self.settings.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        decode::<TokenClaims>(token, &DecodingKey::from_secret(key.as_bytes()), &validation)
            .map(|data| {
                debug!(
                    username = %data.claims.sub,
                    jti = %data.claims.jti,
                    exp = data.claims.exp,
                    "JWT token decoded successfully"
                );
                data.claims
            })
            .map_err(|e| {
                debug!(error = %e, "Failed to decode JWT token");
                AppError::JwtError(e.to_string())
            })
    }

    fn signing_key(&self) -> Result<&str, AppError> {
        match self.settings.key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key),
            _ => {
                error!("JWT signing key is not configured");
                Err(AppError::Configuration(
                    "JWT Key is missing from configuration.".to_string(),
                ))
            }
        }
    }
}
