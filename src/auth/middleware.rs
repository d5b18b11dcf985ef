use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{info, instrument, warn};

use crate::shared::{AppError, AppState};

/// Bearer token middleware - validates the Authorization header and adds TokenClaims to the request.
/// Usage: .layer(middleware::from_fn_with_state(app_state.clone(), auth::bearer_auth))
/// Handlers can then extract Extension(claims): Extension<TokenClaims>.
#[instrument(skip(state, req, next))]
pub async fn bearer_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| {
            warn!("Missing Authorization header in request");
            AppError::Unauthenticated("Missing authorization header".to_string())
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        warn!("Invalid Authorization header format (expected Bearer token)");
        AppError::Unauthenticated("Invalid authorization header format".to_string())
    })?;

    let claims = match state.token_issuer.validate(token) {
        Ok(claims) => claims,
        Err(e) => {
            warn!("Bearer authentication failed: {}", e);
            return Err(e);
        }
    };

    info!(
        username = %claims.sub,
        jti = %claims.jti,
        "Bearer token accepted"
    );

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
