use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{info, instrument, warn};

use crate::shared::{AppError, AppState};

/// JWT authentication middleware - validates Authorization Bearer header and adds SessionClaims to request.
/// Usage: .route_layer(middleware::from_fn_with_state(app_state.clone(), session::jwt_auth))
/// Handlers can then extract Extension(claims): Extension<SessionClaims>.
///
/// The credential is the second space-separated word of the header, whatever
/// the scheme. A missing header or missing credential is 401; a credential
/// that fails validation is 403.
#[instrument(skip(state, req, next))]
pub async fn jwt_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    info!(
        "JWT authentication middleware triggered for request {}",
        req.uri()
    );

    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| {
            warn!("Missing Authorization header in request");
            AppError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header
        .split(' ')
        .nth(1)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            warn!("Authorization header carries no token");
            AppError::Unauthorized("Missing token".to_string())
        })?;

    let claims = match state.token_config.validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            warn!("JWT authentication failed: {}", e);
            return Err(e);
        }
    };

    info!(
        user_id = %claims.user_id,
        role = %claims.role,
        "Authentication successful, adding claims to request"
    );

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionClaims;
    use crate::shared::test_utils::AppStateBuilder;
    use crate::user::Role;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        middleware,
        routing::get,
        Extension, Router,
    };
    use rstest::rstest;
    use tower::ServiceExt; // for `oneshot`
    use uuid::Uuid;

    async fn whoami(Extension(claims): Extension<SessionClaims>) -> String {
        format!("{}:{}", claims.user_id, claims.role)
    }

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/protected", get(whoami))
            .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth))
            .with_state(state)
    }

    fn request_with_auth(header: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri("/protected");
        if let Some(value) = header {
            builder = builder.header("Authorization", value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let state = AppStateBuilder::new().build();
        let response = app(state).oneshot(request_with_auth(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[case("Bearer")]
    #[case("Bearer ")]
    #[case("abc.def.ghi")]
    #[tokio::test]
    async fn test_header_without_token_is_unauthorized(#[case] header: &str) {
        let state = AppStateBuilder::new().build();
        let response = app(state)
            .oneshot(request_with_auth(Some(header)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[case("Basic dXNlcjpwYXNz")]
    #[case("Token abc")]
    #[case("Bearer not-a-jwt")]
    #[tokio::test]
    async fn test_credential_that_is_not_our_jwt_is_forbidden(#[case] header: &str) {
        let state = AppStateBuilder::new().build();
        let response = app(state)
            .oneshot(request_with_auth(Some(header)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_scheme_name_is_not_checked() {
        let state = AppStateBuilder::new().build();
        let token = state
            .token_config
            .create_token(Uuid::new_v4(), Role::Donor)
            .unwrap();

        let response = app(state)
            .oneshot(request_with_auth(Some(&format!("JWT {}", token))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_tampered_token_is_forbidden() {
        let state = AppStateBuilder::new().build();
        let token = state
            .token_config
            .create_token(Uuid::new_v4(), Role::Donor)
            .unwrap();
        let tampered = format!("{}x", token);

        let response = app(state)
            .oneshot(request_with_auth(Some(&format!("Bearer {}", tampered))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_valid_token_attaches_claims() {
        let state = AppStateBuilder::new().build();
        let user_id = Uuid::new_v4();
        let token = state
            .token_config
            .create_token(user_id, Role::Receiver)
            .unwrap();

        let response = app(state)
            .oneshot(request_with_auth(Some(&format!("Bearer {}", token))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(
            String::from_utf8(body.to_vec()).unwrap(),
            format!("{}:receiver", user_id)
        );
    }
}
