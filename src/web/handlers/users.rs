//! User account handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::forum::ForumService;
use crate::web::dto::{
    ApiResponse, CommunityResponse, EditUserRequest, EditUserResponse, MessageResponse, UserInfo,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::{AdminUser, AuthUser};

use super::posts::parse_id;

/// GET /users - Community overview.
///
/// Public: the member list and aggregate counts are the one surface
/// visible without a session.
pub async fn community(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<CommunityResponse>>, ApiError> {
    let service = ForumService::new(&state.db);
    let users = service.list_users().await?;
    let stats = service.stats().await?;

    let response = CommunityResponse {
        users: users.iter().map(UserInfo::from).collect(),
        stats: stats.into(),
    };

    Ok(Json(ApiResponse::new(response)))
}

/// GET /delete-user/:id - Delete an account and all its content.
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let target_id = parse_id(&id, "user")?;
    let service = ForumService::new(&state.db);
    service
        .delete_user(target_id, auth.user.id, auth.user.role)
        .await?;

    // Any sessions the deleted account still held die right away
    state.sessions.lock().await.logout_user(target_id);

    Ok(Json(ApiResponse::new(MessageResponse::new("user deleted"))))
}

/// POST /edit-user/:id - Rename an account and set a new password.
pub async fn edit_user(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<EditUserRequest>,
) -> Result<Json<ApiResponse<EditUserResponse>>, ApiError> {
    let target_id = parse_id(&id, "user")?;
    let service = ForumService::new(&state.db);
    let updated = service
        .edit_user(
            target_id,
            auth.user.id,
            auth.user.role,
            &req.name,
            &req.password,
        )
        .await?;

    let token = {
        let mut sessions = state.sessions.lock().await;
        if auth.user.id == target_id {
            // Editing your own account rotates the session in place
            sessions.logout(&auth.token);
            Some(sessions.create_session(target_id).token)
        } else {
            // An admin edit kicks the target out everywhere
            sessions.logout_user(target_id);
            None
        }
    };

    let response = EditUserResponse {
        user: UserInfo::from(&updated),
        token,
    };

    Ok(Json(ApiResponse::new(response)))
}

/// GET /reset-user/:id - Reset an account's password to the recovery default.
pub async fn reset_user(
    State(state): State<Arc<AppState>>,
    AdminUser(auth): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let target_id = parse_id(&id, "user")?;
    let service = ForumService::new(&state.db);
    service.reset_password(target_id, auth.user.role).await?;

    Ok(Json(ApiResponse::new(MessageResponse::new(
        "password reset",
    ))))
}
