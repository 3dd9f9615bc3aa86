//! Authentication Middleware
//!
//! Axum middleware for JWT authentication and authorization. The set of
//! exempted paths is part of [`AuthGateConfig`], built once at startup.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

/// Paths exempted from authentication, derived from the API base path
#[derive(Debug, Clone)]
pub struct AuthGateConfig {
    /// Exact paths open to any method
    pub public_paths: Vec<String>,
    /// Prefixes open for GET (catalog reads)
    pub public_get_prefixes: Vec<String>,
}

impl AuthGateConfig {
    pub fn for_api_base(api_base: &str) -> Self {
        Self {
            public_paths: vec![
                format!("{api_base}/users/login"),
                format!("{api_base}/users/register"),
            ],
            public_get_prefixes: vec![
                format!("{api_base}/products"),
                format!("{api_base}/categories"),
            ],
        }
    }

    /// Whether the request may pass without a credential
    pub fn is_public(&self, method: &http::Method, path: &str) -> bool {
        if self.public_paths.iter().any(|p| p == path) {
            return true;
        }
        if (method == http::Method::GET || method == http::Method::OPTIONS)
            && self
                .public_get_prefixes
                .iter()
                .any(|prefix| path.starts_with(prefix.as_str()))
        {
            return true;
        }
        false
    }
}

/// Require authentication middleware
///
/// Extracts and validates the JWT token from the Authorization header.
/// If valid, adds the CurrentUser to the request extensions.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path().to_string();

    // Allow OPTIONS requests for CORS preflight (skip auth)
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // Skip auth for non-API routes (health etc.; they 404 normally)
    if !path.starts_with(state.config.api_base.as_str()) {
        return Ok(next.run(req).await);
    }

    if state.config.auth_gate.is_public(req.method(), &path) {
        return Ok(next.run(req).await);
    }

    let jwt_service = state.get_jwt_service();
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header).ok_or(AppError::InvalidToken)?,
        None => {
            security_log!("WARN", "auth_missing", uri = %path);
            return Err(AppError::Unauthorized);
        }
    };

    match jwt_service.validate_token(token) {
        Ok(claims) => {
            let user = CurrentUser::from(claims);
            tracing::debug!(user_id = %user.id, "User authenticated");
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!("WARN", "auth_failed", error = %e.to_string(), uri = %path);
            match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::TokenExpired),
                _ => Err(AppError::InvalidToken),
            }
        }
    }
}

/// Require admin role middleware
///
/// Must run inside `require_auth` so the CurrentUser extension exists.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::Unauthorized)?;
    if !user.is_admin {
        security_log!(
            "WARN",
            "admin_required",
            user_id = %user.id,
            uri = %req.uri().path()
        );
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_paths_for_api_base() {
        let gate = AuthGateConfig::for_api_base("/api/v1");

        assert!(gate.is_public(&http::Method::POST, "/api/v1/users/login"));
        assert!(gate.is_public(&http::Method::POST, "/api/v1/users/register"));
        assert!(gate.is_public(&http::Method::GET, "/api/v1/products"));
        assert!(gate.is_public(&http::Method::GET, "/api/v1/categories/category:1"));

        assert!(!gate.is_public(&http::Method::POST, "/api/v1/products"));
        assert!(!gate.is_public(&http::Method::DELETE, "/api/v1/categories/category:1"));
        assert!(!gate.is_public(&http::Method::GET, "/api/v1/orders"));
        assert!(!gate.is_public(&http::Method::POST, "/api/v1/orders"));
    }
}
