use axum::extract::{Path, State};

use crate::{
    models::{auth::AuthenticatedUser, user::User},
    response::{parse_id, ApiError, ApiResponse},
    services::users::UserService,
    AppState,
};

/// The caller's own account.
pub async fn me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<ApiResponse<User>, ApiError> {
    let found = UserService::get(state.users.as_ref(), user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(ApiResponse::ok("User profile retrieved", found))
}

pub async fn get_user(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<User>, ApiError> {
    let id = parse_id(&id)?;
    let found = UserService::get(state.users.as_ref(), id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(ApiResponse::ok("User retrieved", found))
}
