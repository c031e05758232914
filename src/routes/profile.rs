use axum::extract::State;

use crate::{
    models::{
        auth::AuthenticatedUser,
        profile::{Profile, ProfileRequest},
    },
    response::{ApiError, ApiResponse, ValidatedJson},
    services::profiles::ProfileService,
    AppState,
};

pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<ApiResponse<Profile>, ApiError> {
    let profile = ProfileService::get(state.profiles.as_ref(), user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile not found"))?;
    Ok(ApiResponse::ok("Profile retrieved", profile))
}

pub async fn upsert_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(body): ValidatedJson<ProfileRequest>,
) -> Result<ApiResponse<Profile>, ApiError> {
    let profile = ProfileService::upsert(state.profiles.as_ref(), user.user_id, &body).await?;
    Ok(ApiResponse::ok("Profile updated successfully", profile))
}
