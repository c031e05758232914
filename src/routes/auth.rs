use axum::extract::State;

use crate::{
    models::{
        auth::TokenPair,
        user::{SigninRequest, SignupRequest, User},
    },
    response::{ApiError, ApiResponse, ValidatedJson},
    services::auth::AuthService,
    AppState,
};

pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<SignupRequest>,
) -> Result<ApiResponse<User>, ApiError> {
    let user = AuthService::signup(state.users.as_ref(), state.hasher, body).await?;
    Ok(ApiResponse::created("User registered successfully", user))
}

pub async fn signin(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<SigninRequest>,
) -> Result<ApiResponse<TokenPair>, ApiError> {
    let pair = AuthService::signin(
        state.users.as_ref(),
        state.hasher,
        &state.tokens,
        &body.email,
        &body.password,
    )
    .await?;
    Ok(ApiResponse::ok("Login successful", pair))
}
