//! Post and comment handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::forum::{ForumEvent, ForumService};
use crate::web::dto::{
    ApiResponse, CommentInfo, CreateCommentRequest, CreatePostRequest, MessageResponse,
    PostCountResponse, PostDetailResponse, PostInfo,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// Parse a path id, treating anything unparsable as a missing resource.
pub(super) fn parse_id(raw: &str, resource: &str) -> Result<i64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::not_found(format!("{} not found", resource)))
}

/// GET /posts - List all posts, newest first.
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<PostInfo>>>, ApiError> {
    let service = ForumService::new(&state.db);
    let posts = service.list_posts().await?;

    let posts: Vec<PostInfo> = posts.iter().map(PostInfo::from).collect();

    Ok(Json(ApiResponse::new(posts)))
}

/// POST /posts - Create a post.
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(req): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PostInfo>>), ApiError> {
    let service = ForumService::new(&state.db);
    let post = service
        .create_post(auth.user.id, req.title, req.subtitle)
        .await?;

    // The row is committed; whether anyone is listening is not our problem
    let _ = state.events.send(ForumEvent::PostCreated(post.clone()));

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(PostInfo::from(&post))),
    ))
}

/// GET /post/:id - A post with its comments.
///
/// Id 0 is the refresh-polling sentinel and returns the post count instead
/// of a post body.
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let post_id = parse_id(&id, "post")?;
    let service = ForumService::new(&state.db);

    if post_id == 0 {
        let count = service.post_count().await?;
        return Ok(Json(ApiResponse::new(PostCountResponse { count })).into_response());
    }

    let (post, comments) = service.get_post(post_id).await?;

    let response = PostDetailResponse {
        post: PostInfo::from(&post),
        comments: comments.iter().map(CommentInfo::from).collect(),
    };

    Ok(Json(ApiResponse::new(response)).into_response())
}

/// POST /post/:id - Add a comment to a post.
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CommentInfo>>), ApiError> {
    let post_id = parse_id(&id, "post")?;
    let service = ForumService::new(&state.db);
    let comment = service
        .create_comment(auth.user.id, post_id, req.content)
        .await?;

    let _ = state.events.send(ForumEvent::CommentCreated(comment.clone()));

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(CommentInfo::from(&comment))),
    ))
}

/// GET /delete_post/:id - Delete a post and everything under it.
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let post_id = parse_id(&id, "post")?;
    let service = ForumService::new(&state.db);
    service
        .delete_post(post_id, auth.user.id, auth.user.role)
        .await?;

    Ok(Json(ApiResponse::new(MessageResponse::new("post deleted"))))
}

/// GET /delete-comment/:id - Delete a single comment.
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let comment_id = parse_id(&id, "comment")?;
    let service = ForumService::new(&state.db);
    service
        .delete_comment(comment_id, auth.user.id, auth.user.role)
        .await?;

    Ok(Json(ApiResponse::new(MessageResponse::new(
        "comment deleted",
    ))))
}
