//! Caller identity extraction.
//!
//! Authentication happens upstream. The gateway in front of this service
//! forwards the verified user id and role in [`USER_ID_HEADER`] and
//! [`ROLE_HEADER`]; handlers that act on behalf of a user take an
//! [`Actor`] argument.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::{Actor, Role, UserId};
use crate::error::ApiError;

/// Header carrying the caller's user id (UUID).
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the caller's role. Defaults to `player` when absent.
pub const ROLE_HEADER: &str = "x-user-role";

impl<S: Send + Sync> FromRequestParts<S> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw_id = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| ApiError::Unauthenticated("missing X-User-Id header".to_string()))?;
        let user_id = raw_id
            .to_str()
            .ok()
            .and_then(|v| uuid::Uuid::parse_str(v.trim()).ok())
            .map(UserId::from_uuid)
            .ok_or_else(|| {
                ApiError::Unauthenticated("X-User-Id header is not a valid UUID".to_string())
            })?;

        let role = match parts.headers.get(ROLE_HEADER) {
            None => Role::default(),
            Some(raw) => raw
                .to_str()
                .ok()
                .and_then(|v| v.parse::<Role>().ok())
                .ok_or_else(|| {
                    ApiError::Unauthenticated("X-User-Role header names an unknown role".to_string())
                })?,
        };

        Ok(Self::new(user_id, role))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(headers: &[(&str, &str)]) -> Result<Actor, ApiError> {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let Ok(request) = builder.body(()) else {
            panic!("valid request");
        };
        let (mut parts, ()) = request.into_parts();
        Actor::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn role_defaults_to_player() {
        let id = uuid::Uuid::new_v4().to_string();
        let Ok(actor) = extract(&[(USER_ID_HEADER, id.as_str())]).await else {
            panic!("extraction failed");
        };
        assert_eq!(actor.role, Role::Player);
        assert_eq!(actor.user_id.to_string(), id);
    }

    #[tokio::test]
    async fn admin_role_is_read() {
        let id = uuid::Uuid::new_v4().to_string();
        let Ok(actor) = extract(&[(USER_ID_HEADER, id.as_str()), (ROLE_HEADER, "admin")]).await else {
            panic!("extraction failed");
        };
        assert!(actor.is_admin());
    }

    #[tokio::test]
    async fn missing_or_bad_identity_is_unauthenticated() {
        assert!(matches!(extract(&[]).await, Err(ApiError::Unauthenticated(_))));
        assert!(matches!(
            extract(&[(USER_ID_HEADER, "not-a-uuid")]).await,
            Err(ApiError::Unauthenticated(_))
        ));
        let id = uuid::Uuid::new_v4().to_string();
        assert!(matches!(
            extract(&[(USER_ID_HEADER, id.as_str()), (ROLE_HEADER, "superuser")]).await,
            Err(ApiError::Unauthenticated(_))
        ));
    }
}
