use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::ResponseError,
    http::header,
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::token::verify_token;
use crate::error::{AppError, AuthError};

/// Access guard for the `/api` scope.
///
/// Every request passing through it must carry `Authorization: Bearer <token>`;
/// on success the resolved user id is inserted into request extensions for the
/// `AuthenticatedUserId` extractor, on failure the guard renders the 401 itself
/// and no handler runs. Registration and login are exempt.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Skip authentication for health check and auth endpoints
        let path = req.path();
        if path == "/health"
            || path.starts_with("/api/auth/login")
            || path.starts_with("/api/auth/register")
        {
            let fut = self.service.call(req);
            return Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) });
        }

        let auth_result: Result<i32, AppError> = {
            let header_value = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok());

            match header_value {
                None => Err(AppError::Auth(AuthError::MissingToken)),
                Some(value) => match value.strip_prefix("Bearer ") {
                    Some(token) if !token.is_empty() => verify_token(token).map(|c| c.sub),
                    // No prefix, or an empty remainder after it.
                    _ => Err(AppError::Auth(AuthError::MalformedToken)),
                },
            }
        };

        match auth_result {
            Ok(user_id) => {
                req.extensions_mut().insert(user_id);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(err) => {
                let (request, _payload) = req.into_parts();
                let response = err.error_response().map_into_right_body();
                Box::pin(ready(Ok(ServiceResponse::new(request, response))))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App, HttpResponse};

    async fn whoami(user_id: crate::auth::AuthenticatedUserId) -> HttpResponse {
        HttpResponse::Ok().json(serde_json::json!({ "userId": user_id.0 }))
    }

    macro_rules! guarded_app {
        () => {
            test::init_service(App::new().service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .route("/whoami", web::get().to(whoami)),
            ))
            .await
        };
    }

    #[actix_rt::test]
    async fn test_missing_header_is_rejected() {
        let app = guarded_app!();
        let req = test::TestRequest::get().uri("/api/whoami").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Access denied. No token provided.");
    }

    #[actix_rt::test]
    async fn test_header_without_bearer_prefix_is_rejected() {
        let app = guarded_app!();
        let req = test::TestRequest::get()
            .uri("/api/whoami")
            .append_header((header::AUTHORIZATION, "Token abc123"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn test_empty_bearer_token_is_rejected() {
        let app = guarded_app!();
        let req = test::TestRequest::get()
            .uri("/api/whoami")
            .append_header((header::AUTHORIZATION, "Bearer "))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn test_valid_token_reaches_handler_with_identity() {
        // Hold the env lock for the whole request so parallel token tests
        // cannot swap JWT_SECRET between issuance and verification.
        let _guard = crate::auth::token::test_support::JWT_ENV_LOCK
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        std::env::set_var("JWT_SECRET", "middleware-test-secret");

        let token = crate::auth::generate_token(42).unwrap();
        let app = guarded_app!();
        let req = test::TestRequest::get()
            .uri("/api/whoami")
            .append_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["userId"], 42);

        std::env::remove_var("JWT_SECRET");
    }
}
