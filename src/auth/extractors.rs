use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::{AppError, AuthError};

/// Extracts the authenticated user's ID from request extensions.
///
/// This extractor is intended for routes protected by `AuthMiddleware`, which
/// validates the bearer token and inserts the resolved user id into request
/// extensions. If the id is missing (the guard did not run), the request is
/// rejected as unauthorized rather than proceeding with no identity.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUserId(pub i32);

impl FromRequest for AuthenticatedUserId {
    type Error = ActixError; // AppError converts into ActixError via ResponseError
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<i32>().cloned() {
            Some(user_id) => ready(Ok(AuthenticatedUserId(user_id))),
            None => {
                let err = AppError::Auth(AuthError::MissingToken);
                ready(Err(err.into()))
            }
        }
    }
}
