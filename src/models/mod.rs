pub mod auth;
pub mod post;
pub mod profile;
pub mod user;
