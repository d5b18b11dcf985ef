use axum::{Extension, Json};
use tracing::instrument;

use super::types::{TokenClaims, WhoAmIResponse};

/// GET /api/whoami
/// Echoes the identity asserted by a valid bearer token
#[instrument(name = "whoami", skip_all)]
pub async fn whoami(Extension(claims): Extension<TokenClaims>) -> Json<WhoAmIResponse> {
    Json(WhoAmIResponse {
        username: claims.sub,
        token_id: claims.jti,
        expires_at: claims.exp,
    })
}
