// ABOUTME: Session authentication for API requests
// ABOUTME: Middleware resolves the session token; the CurrentUser extractor rejects anonymous calls

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use planforge_auth::AuthContext;

use crate::error::AppError;
use crate::AppState;

/// Cookie carrying the session token for browser clients
pub const SESSION_COOKIE: &str = "planforge_session";

/// Paths that don't require authentication
const WHITELISTED_PATHS: &[&str] = &["/api/health"];

fn requires_authentication(path: &str) -> bool {
    !WHITELISTED_PATHS
        .iter()
        .any(|&whitelisted| path.starts_with(whitelisted))
}

/// Session token from `Authorization: Bearer` or the session cookie
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Verifies the session token, if any, and stores the resulting
/// `AuthContext` in request extensions
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    if !requires_authentication(&path) {
        debug!(path = %path, "Path whitelisted, skipping session verification");
        return Ok(next.run(request).await);
    }

    let Some(token) = session_token(request.headers()) else {
        warn!(path = %path, "Missing session token");
        return Err(AppError::Unauthorized);
    };

    let context = state.sessions.verify(&token).await.map_err(|e| {
        warn!(error = %e, "Session verification failed");
        AppError::Unauthorized
    })?;

    let Some(context) = context else {
        warn!(path = %path, "Invalid or expired session token");
        return Err(AppError::Unauthorized);
    };

    debug!(path = %path, user_id = %context.user_id, "Session verified");
    request.extensions_mut().insert(context);

    Ok(next.run(request).await)
}

/// Current authenticated caller
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthContext);

impl CurrentUser {
    pub fn user_id(&self) -> &str {
        &self.0.user_id
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(CurrentUser)
            .ok_or(AppError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_requires_authentication_logic() {
        assert!(!requires_authentication("/api/health"));
        assert!(requires_authentication("/api/plans"));
        assert!(requires_authentication("/api/research"));
    }

    #[test]
    fn test_session_token_prefers_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("planforge_session=xyz"),
        );
        assert_eq!(session_token(&headers), Some("abc".to_string()));
    }

    #[test]
    fn test_session_token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; planforge_session=xyz; other=1"),
        );
        assert_eq!(session_token(&headers), Some("xyz".to_string()));
    }

    #[test]
    fn test_session_token_absent() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(session_token(&headers), None);
    }
}
