pub mod auth;
pub mod image;
