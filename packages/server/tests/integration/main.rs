mod auth;
mod support;
