pub mod admin;
pub mod auth;
pub mod fallback;
pub mod health;
