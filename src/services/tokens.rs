use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    config::Config,
    models::auth::{AuthenticatedUser, Claims, TokenKind},
};

/// Why a single verification failed. Only used internally to choose between
/// an inline refresh and an outright rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token signature or claims are invalid")]
    Invalid,
    #[error("token has expired")]
    Expired,
}

#[derive(Debug, thiserror::Error)]
#[error("failed to sign token: {0}")]
pub struct SigningError(#[from] jsonwebtoken::errors::Error);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    #[error("authorization header is missing or malformed")]
    MissingOrMalformedToken,
    #[error("access token is invalid")]
    InvalidToken,
    #[error("access token expired and no refresh token was provided")]
    RefreshRequired,
    #[error("refresh token is invalid or expired")]
    InvalidRefreshToken,
}

/// Terminal result of one authorization attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Authenticated {
        user: AuthenticatedUser,
        /// Set when the access token had expired and was renewed from the refresh token.
        renewed_access_token: Option<String>,
    },
    Rejected(RejectReason),
}

/// Issues and verifies HS256 access/refresh tokens. Immutable after construction.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is compared against our own clock after the kind check.
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.jwt_secret,
            Duration::hours(config.jwt_expiry_hours as i64),
            Duration::hours(config.jwt_refresh_expiry_hours as i64),
        )
    }

    pub fn issue_access(&self, user: &AuthenticatedUser) -> Result<String, SigningError> {
        self.issue_at(user, TokenKind::Access, Utc::now())
    }

    pub fn issue_refresh(&self, user: &AuthenticatedUser) -> Result<String, SigningError> {
        self.issue_at(user, TokenKind::Refresh, Utc::now())
    }

    pub(crate) fn issue_at(
        &self,
        user: &AuthenticatedUser,
        kind: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<String, SigningError> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let claims = Claims {
            sub: user.user_id,
            role: user.role,
            kind,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(token)
    }

    /// Verify signature, kind and expiry of a single token.
    pub fn verify(&self, token: &str, kind: TokenKind) -> Result<Claims, TokenError> {
        self.verify_at(token, kind, Utc::now())
    }

    pub(crate) fn verify_at(
        &self,
        token: &str,
        kind: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|_| TokenError::Invalid)?
            .claims;
        if claims.kind != kind {
            return Err(TokenError::Invalid);
        }
        if claims.exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }

    /// Authorize a request from its `Authorization` header value and an
    /// optional refresh token, renewing an expired access token inline.
    ///
    /// `Err` is only returned when signing the renewed token fails.
    pub fn authorize(
        &self,
        authorization: Option<&str>,
        refresh_token: Option<&str>,
    ) -> Result<AuthOutcome, SigningError> {
        self.authorize_at(authorization, refresh_token, Utc::now())
    }

    pub(crate) fn authorize_at(
        &self,
        authorization: Option<&str>,
        refresh_token: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<AuthOutcome, SigningError> {
        let Some(access_token) = authorization.and_then(bearer_value) else {
            return Ok(AuthOutcome::Rejected(RejectReason::MissingOrMalformedToken));
        };

        match self.verify_at(access_token, TokenKind::Access, now) {
            Ok(claims) => Ok(AuthOutcome::Authenticated {
                user: AuthenticatedUser::from(&claims),
                renewed_access_token: None,
            }),
            Err(TokenError::Invalid) => Ok(AuthOutcome::Rejected(RejectReason::InvalidToken)),
            Err(TokenError::Expired) => self.refresh_at(refresh_token, now),
        }
    }

    fn refresh_at(
        &self,
        refresh_token: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<AuthOutcome, SigningError> {
        let Some(refresh_token) = refresh_token.filter(|t| !t.is_empty()) else {
            return Ok(AuthOutcome::Rejected(RejectReason::RefreshRequired));
        };

        let claims = match self.verify_at(refresh_token, TokenKind::Refresh, now) {
            Ok(claims) => claims,
            Err(_) => return Ok(AuthOutcome::Rejected(RejectReason::InvalidRefreshToken)),
        };

        // The refresh claims were verified independently and are authoritative.
        let user = AuthenticatedUser::from(&claims);
        let renewed = self.issue_at(&user, TokenKind::Access, now)?;
        Ok(AuthOutcome::Authenticated {
            user,
            renewed_access_token: Some(renewed),
        })
    }
}

/// `"Bearer <token>"`: exactly two space-separated parts.
fn bearer_value(header: &str) -> Option<&str> {
    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Some(token),
        _ => None,
    }
}
