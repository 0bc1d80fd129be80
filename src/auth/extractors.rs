use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use uuid::Uuid;

use crate::auth::jwt::JwtKeys;
use crate::auth::repo::User;
use crate::error::ApiError;
use crate::state::AppState;
use tracing::warn;

/// The caller's identity with the password hash stripped, attached to every
/// protected request by the [`AuthUser`] extractor.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Access guard: extracts a token (bearer header, then `token` cookie),
/// verifies it and re-resolves the user from the store. Pure validation with
/// a single lookup; failures short-circuit to 401 with no side effects.
pub struct AuthUser(pub CurrentUser);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .or_else(|| cookie_token(&parts.headers))
            .ok_or_else(|| ApiError::Unauthorized("Not authorized, no token".into()))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(&token).map_err(|_| {
            warn!("invalid or expired token");
            ApiError::Unauthorized("Not authorized, token failed".into())
        })?;

        // The token may outlive the account; only a live user authorizes.
        let user = User::find_by_id(&state.db, claims.sub)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %claims.sub, "token resolved to missing user");
                ApiError::Unauthorized("User not found".into())
            })?;

        Ok(AuthUser(CurrentUser {
            id: user.id,
            name: user.name,
            email: user.email,
        }))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(COOKIE)?.to_str().ok()?;
    value.split(';').find_map(|pair| {
        let token = pair.trim().strip_prefix("token=")?;
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn bearer_header_wins() {
        let h = headers(&[
            ("authorization", "Bearer abc.def.ghi"),
            ("cookie", "token=from-cookie"),
        ]);
        assert_eq!(bearer_token(&h).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn falls_back_to_token_cookie() {
        let h = headers(&[("cookie", "theme=dark; token=abc.def.ghi; lang=en")]);
        assert_eq!(cookie_token(&h).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn rejects_non_bearer_scheme() {
        let h = headers(&[("authorization", "Basic dXNlcjpwYXNz")]);
        assert!(bearer_token(&h).is_none());
    }

    #[test]
    fn empty_values_count_as_absent() {
        let h = headers(&[("authorization", "Bearer "), ("cookie", "token=")]);
        assert!(bearer_token(&h).is_none());
        assert!(cookie_token(&h).is_none());
    }

    #[test]
    fn no_headers_means_no_token() {
        let h = HeaderMap::new();
        assert!(bearer_token(&h).is_none());
        assert!(cookie_token(&h).is_none());
    }
}
