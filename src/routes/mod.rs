pub mod admin;
pub mod auth;
pub mod health;
pub mod metrics;
pub mod posts;
pub mod profile;
pub mod users;

use crate::response::ApiError;

pub async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
