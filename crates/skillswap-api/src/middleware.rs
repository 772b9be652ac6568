//! Middleware — authentication extraction.
//!
//! The authenticated user is request-scoped context, never ambient global
//! state: handlers receive it through an extension and pass it explicitly to
//! every store operation.

use axum::{
    extract::Request,
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use skillswap_common::error::SkillSwapError;

use crate::auth::{self, TokenKind};

/// Authentication context extracted from the Authorization header.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: uuid::Uuid,
    pub name: String,
}

/// Pull the token out of `Authorization: Bearer <token>`.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Authenticate the request and stash an [`AuthContext`] in its extensions.
/// Requires an access token; refresh tokens are only good for `/auth/refresh`.
pub async fn auth_middleware(mut request: Request, next: Next) -> Result<Response, SkillSwapError> {
    let token = bearer_token(request.headers()).ok_or(SkillSwapError::Unauthorized)?;

    let config = skillswap_common::config::get();
    let claims = auth::validate_token(token, &config.auth.jwt_secret, TokenKind::Access)?;

    let auth_ctx = AuthContext {
        user_id: claims.user_id()?,
        name: claims.name,
    };
    request.extensions_mut().insert(auth_ctx);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("abc123"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc123"),
        );
        assert_eq!(bearer_token(&headers), Some("abc123"));
    }
}
