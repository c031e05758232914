use axum::extract::{Path, State};

use crate::{
    models::{
        auth::AuthenticatedUser,
        post::{CreatePostRequest, Post},
    },
    response::{parse_id, ApiError, ApiResponse, ValidatedJson},
    services::posts::PostService,
    AppState,
};

pub async fn list_posts(State(state): State<AppState>) -> Result<ApiResponse<Vec<Post>>, ApiError> {
    let posts = PostService::list(state.posts.as_ref(), &state.post_cache).await?;
    Ok(ApiResponse::ok("Posts retrieved", posts))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Post>, ApiError> {
    let id = parse_id(&id)?;
    let post = PostService::get(state.posts.as_ref(), id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;
    Ok(ApiResponse::ok("Post retrieved", post))
}

pub async fn create_post(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(body): ValidatedJson<CreatePostRequest>,
) -> Result<ApiResponse<Post>, ApiError> {
    let post =
        PostService::create(state.posts.as_ref(), &state.post_cache, user.user_id, &body).await?;
    Ok(ApiResponse::created("Post created successfully", post))
}
