use crate::{
    db::{users::UserRepository, StoreError},
    models::{
        auth::{AuthenticatedUser, TokenPair},
        user::{NewUser, SignupRequest, User, UserRole},
    },
    services::{
        metrics::{SIGNINS_COUNTER, SIGNUPS_COUNTER},
        password::{PasswordError, PasswordHasher},
        tokens::{SigningError, TokenService},
    },
};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("email already registered")]
    DuplicateEmail,
    /// Deliberately covers both "no such user" and "wrong password".
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error(transparent)]
    HashingFailure(#[from] PasswordError),
    #[error("persistence failure: {0}")]
    PersistenceFailure(StoreError),
    #[error(transparent)]
    TokenSigning(#[from] SigningError),
}

pub struct AuthService;

impl AuthService {
    /// Register a new account. The role defaults to `User` when not given.
    pub async fn signup(
        users: &dyn UserRepository,
        hasher: PasswordHasher,
        req: SignupRequest,
    ) -> Result<User, AuthError> {
        let role = req.role.unwrap_or(UserRole::User);
        if role == UserRole::Admin {
            // Callers may self-assign admin; kept for compatibility but surfaced in logs.
            tracing::warn!("signup: admin role requested for {}", req.email);
        }

        let password_hash = hasher.hash_blocking(req.password).await?;

        let result = users
            .create(NewUser {
                email: req.email,
                password_hash,
                role,
            })
            .await;

        match result {
            Ok(user) => {
                SIGNUPS_COUNTER.with_label_values(&["created"]).inc();
                tracing::info!("signup: created user_id={} role={}", user.id, role);
                Ok(user)
            }
            Err(StoreError::DuplicateKey) => {
                SIGNUPS_COUNTER.with_label_values(&["duplicate"]).inc();
                Err(AuthError::DuplicateEmail)
            }
            Err(e) => {
                SIGNUPS_COUNTER.with_label_values(&["error"]).inc();
                Err(AuthError::PersistenceFailure(e))
            }
        }
    }

    /// Check credentials and issue an access/refresh token pair.
    pub async fn signin(
        users: &dyn UserRepository,
        hasher: PasswordHasher,
        tokens: &TokenService,
        email: &str,
        password: &str,
    ) -> Result<TokenPair, AuthError> {
        let result = Self::check_credentials(users, hasher, email, password).await;
        let user = match result {
            Ok(user) => user,
            Err(e) => {
                let status = match e {
                    AuthError::InvalidCredentials => "invalid",
                    _ => "error",
                };
                SIGNINS_COUNTER.with_label_values(&[status]).inc();
                return Err(e);
            }
        };

        let identity = AuthenticatedUser::from(&user);
        let pair = TokenPair {
            token: tokens.issue_access(&identity)?,
            refresh_token: tokens.issue_refresh(&identity)?,
        };
        SIGNINS_COUNTER.with_label_values(&["success"]).inc();
        tracing::info!("signin: user_id={}", user.id);
        Ok(pair)
    }

    async fn check_credentials(
        users: &dyn UserRepository,
        hasher: PasswordHasher,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let user = users
            .find_by_email(email)
            .await
            .map_err(AuthError::PersistenceFailure)?
            .ok_or(AuthError::InvalidCredentials)?;

        let valid = match hasher
            .verify_blocking(user.password_hash.clone(), password.to_string())
            .await
        {
            Ok(v) => v,
            Err(PasswordError::HashingFailure(e)) => {
                tracing::error!("signin: unreadable password hash for user_id={}: {}", user.id, e);
                false
            }
            Err(e) => return Err(e.into()),
        };
        if !valid {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(user)
    }
}
