//!
//! # Custom Error Handling
//!
//! This module defines the error type `AppError` used throughout the application.
//! It centralizes error management, providing a consistent way to handle and
//! represent the error conditions the API can hit, from database failures to
//! validation problems and rejected tokens.
//!
//! `AppError` implements `actix_web::error::ResponseError` so handler results
//! convert into HTTP responses with the API's uniform `{success, message}` JSON
//! body. `From` implementations for `sqlx::Error`, `validator::ValidationErrors`,
//! `jsonwebtoken::errors::Error`, and `bcrypt::BcryptError` allow conversion with
//! the `?` operator.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Reasons an authenticated request can be rejected at the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// No `Authorization` header was supplied.
    MissingToken,
    /// The header lacked the `Bearer ` prefix, the token part was empty, or the
    /// token could not be parsed at all.
    MalformedToken,
    /// The token's expiry timestamp is in the past.
    Expired,
    /// The token's signature did not verify against the signing secret.
    InvalidSignature,
}

impl AuthError {
    fn message(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "Access denied. No token provided.",
            AuthError::MalformedToken => "Invalid token. Please login again.",
            AuthError::Expired => "Token has expired. Please login again.",
            AuthError::InvalidSignature => "Invalid token. Please login again.",
        }
    }
}

/// Represents all errors that can surface at the request boundary.
#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed input (HTTP 400).
    Validation(String),
    /// Username or email already taken at registration (HTTP 400).
    DuplicateIdentity(String),
    /// Login failed. Deliberately carries no detail so unknown emails and wrong
    /// passwords are indistinguishable to the caller (HTTP 401).
    InvalidCredentials,
    /// Token rejected by the access guard (HTTP 401).
    Auth(AuthError),
    /// Requested resource absent, or owned by someone else (HTTP 404).
    NotFound(String),
    /// Database failure (HTTP 500). The detail is logged, never returned.
    Database(String),
    /// Any other unexpected failure (HTTP 500). Detail logged, never returned.
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::DuplicateIdentity(msg) => write!(f, "Duplicate identity: {}", msg),
            AppError::InvalidCredentials => write!(f, "Invalid credentials"),
            AppError::Auth(reason) => write!(f, "Auth error: {}", reason.message()),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Database(msg) => write!(f, "Database error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

/// Converts `AppError` variants into `{success: false, message}` responses.
///
/// Internal detail (database text, hashing failures) is logged here and masked
/// behind a generic message before it reaches the client.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::DuplicateIdentity(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Validation(msg)
            | AppError::DuplicateIdentity(msg)
            | AppError::NotFound(msg) => msg.clone(),
            AppError::InvalidCredentials => "Invalid email or password".to_string(),
            AppError::Auth(reason) => reason.message().to_string(),
            AppError::Database(detail) | AppError::Internal(detail) => {
                log::error!("internal error: {}", detail);
                "Server error".to_string()
            }
        };

        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "message": message
        }))
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `RowNotFound` maps to `NotFound`, a unique-index violation maps to
/// `DuplicateIdentity` (the indexes back the explicit pre-checks in the
/// handlers), and anything else becomes a masked `Database` error.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match &error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                AppError::DuplicateIdentity(
                    "User with this email or username already exists".into(),
                )
            }
            _ => AppError::Database(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::Validation(error.to_string())
    }
}

/// Converts `jsonwebtoken::errors::Error` into the matching `AuthError`.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        use jsonwebtoken::errors::ErrorKind;
        let reason = match error.kind() {
            ErrorKind::ExpiredSignature => AuthError::Expired,
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            _ => AuthError::MalformedToken,
        };
        AppError::Auth(reason)
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::Internal`.
///
/// This handles errors during password hashing or verification.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(error.to_string())
    }
}

/// Maps JSON body extraction failures (missing fields, wrong types) into the
/// uniform `{success, message}` envelope. Registered via `web::JsonConfig`.
pub fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    AppError::Validation(err.to_string()).into()
}

/// Same for query-string extraction failures. Registered via `web::QueryConfig`.
pub fn query_error_handler(
    err: actix_web::error::QueryPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    AppError::Validation(err.to_string()).into()
}
