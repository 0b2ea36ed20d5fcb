use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::AppError;
use crate::utils::jwt;

/// Authenticated user resolved from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require authentication. When the
/// [`guard`] middleware already ran, the principal it attached to the request
/// is reused instead of validating the token twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: i32,
    pub email: String,
}

/// A way of turning a bearer token into a [`Principal`].
///
/// `Ok(None)` means the token was understood but names nobody; the guard turns
/// that into a generic `Unauthorized`. Errors are passed through unchanged.
pub trait AuthStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn authenticate(&self, token: &str) -> Result<Option<Principal>, AppError>;
}

/// HS256 JWTs issued by `POST /auth/login`.
pub struct JwtStrategy {
    secret: String,
}

impl JwtStrategy {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl AuthStrategy for JwtStrategy {
    fn name(&self) -> &'static str {
        "jwt"
    }

    fn authenticate(&self, token: &str) -> Result<Option<Principal>, AppError> {
        let claims = jwt::verify(token, &self.secret).map_err(|_| AppError::TokenInvalid)?;
        if claims.sub.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(Principal {
            id: claims.uid,
            email: claims.sub,
        }))
    }
}

/// Request guard delegating to a named [`AuthStrategy`].
#[derive(Clone)]
pub struct JwtGuard {
    strategy: Arc<dyn AuthStrategy>,
}

impl JwtGuard {
    pub fn new(strategy: Arc<dyn AuthStrategy>) -> Self {
        Self { strategy }
    }

    pub fn jwt(secret: impl Into<String>) -> Self {
        Self::new(Arc::new(JwtStrategy::new(secret)))
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Authenticate the request and attach the principal to its extensions.
    pub fn validate(&self, parts: &mut Parts) -> Result<Principal, AppError> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;

        let principal = match self.strategy.authenticate(token) {
            Ok(Some(principal)) => principal,
            Ok(None) => {
                tracing::debug!(strategy = self.strategy.name(), "Token resolved to no principal");
                return Err(AppError::Unauthorized);
            }
            Err(err) => {
                tracing::debug!(strategy = self.strategy.name(), error = %err, "Token rejected");
                return Err(err);
            }
        };

        parts.extensions.insert(principal.clone());
        Ok(principal)
    }
}

/// Middleware form of [`JwtGuard::validate`]; rejected requests never reach
/// the inner handler.
pub async fn guard(
    State(guard): State<JwtGuard>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = request.into_parts();
    guard.validate(&mut parts)?;
    Ok(next.run(Request::from_parts(parts, body)).await)
}

impl<S> FromRequestParts<S> for Principal
where
    JwtGuard: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(principal) = parts.extensions.get::<Principal>() {
            return Ok(principal.clone());
        }
        JwtGuard::from_ref(state).validate(parts)
    }
}
