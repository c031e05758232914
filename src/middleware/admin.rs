use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine};

use crate::AppState;

/// Extractor that validates HTTP Basic credentials against `ADMIN_USER` / `ADMIN_PASSWORD`.
pub struct AdminAuth;

/// 401 with a Basic challenge so browsers prompt for credentials.
pub struct AdminChallenge;

impl IntoResponse for AdminChallenge {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, "Basic realm=\"Authorization Required\"")],
        )
            .into_response()
    }
}

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = AdminChallenge;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let (user, password) = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(basic_credentials)
            .ok_or(AdminChallenge)?;

        let user_ok = constant_time_eq(user.as_bytes(), state.config.admin_user.as_bytes());
        let password_ok =
            constant_time_eq(password.as_bytes(), state.config.admin_password.as_bytes());
        if !(user_ok & password_ok) {
            tracing::warn!("admin: rejected basic credentials for user {user}");
            return Err(AdminChallenge);
        }

        Ok(AdminAuth)
    }
}

fn basic_credentials(header: &str) -> Option<(String, String)> {
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = String::from_utf8(STANDARD.decode(encoded).ok()?).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
