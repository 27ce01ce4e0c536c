//! Session authentication middleware.

use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::db::{User, UserRepository};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Extractor for authenticated users.
///
/// Use this extractor to require a valid session for a handler. The handler
/// receives the freshly loaded user row plus the token the request presented,
/// so ownership checks and logout never need a second lookup.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The account behind the session.
    pub user: User,
    /// The session token the request authenticated with.
    pub token: String,
}

/// Pull a session token from the Authorization header or the `token`
/// query parameter. Tokens are UUIDs and never need percent-decoding.
fn extract_token(parts: &Parts) -> Option<String> {
    if let Some(auth_header) = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
    {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            return Some(token.to_string());
        }
    }

    // Query parameter fallback for browser-triggered GET links
    let query = parts.uri.query().unwrap_or("");
    query.split('&').find_map(|pair| {
        let mut kv = pair.splitn(2, '=');
        let key = kv.next()?;
        let value = kv.next()?;
        if key == "token" {
            Some(value.to_string())
        } else {
            None
        }
    })
}

/// Validate the presented token and load the account it belongs to.
async fn resolve_user(parts: &Parts) -> Result<AuthUser, ApiError> {
    let token =
        extract_token(parts).ok_or_else(|| ApiError::unauthorized("Missing authorization"))?;

    // Application state from extensions (set by middleware)
    let state = parts
        .extensions
        .get::<Arc<AppState>>()
        .cloned()
        .ok_or_else(|| ApiError::internal("Application state not configured"))?;

    let user_id = {
        let mut sessions = state.sessions.lock().await;
        sessions
            .touch_session(&token)
            .map(|session| session.user_id)
            .map_err(|e| {
                tracing::debug!("Session validation failed: {}", e);
                ApiError::from(e)
            })?
    };

    let repo = UserRepository::new(state.db.pool());
    match repo.get_by_id(user_id).await? {
        Some(user) => Ok(AuthUser { user, token }),
        None => {
            // The account is gone; its leftover session dies with it
            state.sessions.lock().await.logout(&token);
            Err(ApiError::unauthorized("Invalid or expired token"))
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move { resolve_user(parts).await })
    }
}

/// Optional authentication extractor.
///
/// Similar to AuthUser but doesn't fail if no valid session is presented.
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move { Ok(OptionalAuthUser(resolve_user(parts).await.ok())) })
    }
}

/// Extractor for administrator users.
///
/// Resolves the session like [`AuthUser`] and then requires the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let auth = resolve_user(parts).await?;

            if !auth.user.is_admin() {
                return Err(ApiError::forbidden("Administrator access required"));
            }

            Ok(AdminUser(auth))
        })
    }
}

/// Middleware function to inject application state into request extensions.
pub async fn inject_state(
    state: Arc<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    request.extensions_mut().insert(state);
    next.run(request).await
}
