use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};

use crate::{
    models::auth::AuthenticatedUser,
    response::ApiError,
    services::{metrics::AUTHORIZATIONS_COUNTER, tokens::AuthOutcome},
    AppState,
};

/// Optional request header carrying the refresh token.
pub const REFRESH_TOKEN_HEADER: &str = "x-refresh-token";
/// Response header carrying a renewed access token.
pub const NEW_TOKEN_HEADER: &str = "x-new-token";

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Gate for protected routes: authorizes the bearer token, renewing it inline
/// when it expired and a valid refresh token was sent.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let outcome = {
        let headers = req.headers();
        state
            .tokens
            .authorize(
                header_str(headers, AUTHORIZATION.as_str()),
                header_str(headers, REFRESH_TOKEN_HEADER),
            )
            .map_err(ApiError::internal)?
    };

    match outcome {
        AuthOutcome::Rejected(reason) => {
            let label = format!("{reason:?}");
            AUTHORIZATIONS_COUNTER.with_label_values(&[label.as_str()]).inc();
            tracing::debug!("authorization rejected: {reason}");
            Err(reason.into())
        }
        AuthOutcome::Authenticated {
            user,
            renewed_access_token,
        } => {
            let label = if renewed_access_token.is_some() { "renewed" } else { "authenticated" };
            AUTHORIZATIONS_COUNTER.with_label_values(&[label]).inc();

            req.extensions_mut().insert(user);
            let mut response = next.run(req).await;

            if let Some(token) = renewed_access_token {
                tracing::info!("access token renewed for user_id={}", user.user_id);
                let value = HeaderValue::from_str(&token).map_err(ApiError::internal)?;
                response.headers_mut().insert(NEW_TOKEN_HEADER, value);
            }
            Ok(response)
        }
    }
}

/// Identity established by [`require_auth`]. Handlers outside the gate get a 401.
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .copied()
            .ok_or_else(|| ApiError::unauthorized("Missing or malformed authorization header"))
    }
}
