//! Authentication handlers.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};

use crate::auth::{self, SessionManager};
use crate::db::UserRepository;
use crate::forum::{self, ForumEvent};
use crate::web::dto::{
    ApiResponse, LoginRequest, LoginResponse, MessageResponse, RegisterRequest, SessionResponse,
    UserInfo, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::{AuthUser, OptionalAuthUser};
use crate::Database;

/// Thread-safe database handle for Web API.
pub type SharedDatabase = Arc<Database>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database handle (the sqlx pool is internally shared).
    pub db: SharedDatabase,
    /// Active sessions (wrapped in Mutex for thread safety).
    pub sessions: Arc<Mutex<SessionManager>>,
    /// Broadcast channel for forum events.
    pub events: broadcast::Sender<ForumEvent>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: SharedDatabase, sessions: SessionManager) -> Self {
        Self {
            db,
            sessions: Arc::new(Mutex::new(sessions)),
            events: forum::channel(),
        }
    }
}

/// GET / (also /login and /register) - Session presence.
///
/// Tells a client whether the token it holds is still good, and who it
/// belongs to. Anonymous requests get `logged_in: false` rather than 401.
pub async fn session_presence(user: OptionalAuthUser) -> Json<ApiResponse<SessionResponse>> {
    let response = match user.0 {
        Some(auth) => SessionResponse {
            logged_in: true,
            user: Some(UserInfo::from(&auth.user)),
        },
        None => SessionResponse {
            logged_in: false,
            user: None,
        },
    };

    Json(ApiResponse::new(response))
}

/// POST /login - User login.
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    // Look up the account first; the session manager needs the stored hash
    let repo = UserRepository::new(state.db.pool());
    let user = repo.get_by_name(&req.name).await?;

    let session = {
        let mut sessions = state.sessions.lock().await;
        sessions.login(&req.name, &req.password, user.as_ref())?
    };

    // login() only succeeds when the row exists
    let user = match user {
        Some(user) => user,
        None => return Err(ApiError::internal("An internal error occurred")),
    };

    let response = LoginResponse {
        token: session.token,
        user: UserInfo::from(&user),
    };

    Ok(Json(ApiResponse::new(response)))
}

/// POST /register - Create an account and log it in.
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LoginResponse>>), ApiError> {
    let repo = UserRepository::new(state.db.pool());
    let user = auth::register(&repo, &req.name, &req.password).await?;

    // Fresh accounts go straight to a logged-in session
    let session = state.sessions.lock().await.create_session(user.id);

    let response = LoginResponse {
        token: session.token,
        user: UserInfo::from(&user),
    };

    Ok((StatusCode::CREATED, Json(ApiResponse::new(response))))
}

/// GET /logout - Invalidate the presented session.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Json<ApiResponse<MessageResponse>> {
    state.sessions.lock().await.logout(&auth.token);

    Json(ApiResponse::new(MessageResponse::new("logged out")))
}
