pub mod auth;
pub mod cache;
pub mod metrics;
pub mod password;
pub mod posts;
pub mod profiles;
pub mod tokens;
pub mod users;
